//! Running sums and means.
//!
//! Both aggregators add readings exactly and round once when the result is
//! read, so the result is the same for any order of the same records.

use std::fmt;
use std::marker::PhantomData;

use tallyring_common::types::{Numeric, Reading};

use super::Aggregator;
use super::exact::ExactSum;

/// Exact total, number of accepted readings, and the integer-only total.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Running {
    sum: ExactSum,
    count: u64,
    /// Exact total while every reading was an integer and it fits.
    integers: Option<i128>,
}

impl Default for Running {
    fn default() -> Self {
        Self {
            sum: ExactSum::default(),
            count: 0,
            integers: Some(0),
        }
    }
}

impl Running {
    fn add(&mut self, reading: Reading) {
        if matches!(reading, Reading::Float(v) if !v.is_finite()) {
            return;
        }
        self.integers = match reading {
            Reading::Int(v) => self.integers.and_then(|total| total.checked_add(v)),
            Reading::Float(_) => None,
        };
        self.sum.add(reading);
        self.count += 1;
    }
}

/// Sums the numeric reading of each record.
///
/// Records whose extractor returns `None` (or a non-finite number) are
/// skipped. The empty result is `0.0`. A total beyond the `f64` range is
/// reported as an infinity; [`integer_total`](Self::integer_total) keeps
/// integer totals exact.
pub struct Sum<T: ?Sized, R = Reading, F = fn(&T) -> Option<R>> {
    extract: F,
    running: Running,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T: Numeric> Sum<T> {
    /// Creates a sum over records that are numbers themselves.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fn(<T as Numeric>::reading)
    }
}

impl<T: Numeric> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, R: Into<Reading>, F: Fn(&T) -> Option<R>> Sum<T, R, F> {
    /// Creates a sum over the reading `extract` takes from each record.
    pub fn from_fn(extract: F) -> Self {
        Self {
            extract,
            running: Running::default(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of readings summed so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.running.count
    }

    /// Returns the exact total if every reading so far was an integer.
    ///
    /// `None` once a float was summed, or if the total left the `i128`
    /// range. The total of nothing is `Some(0)`.
    #[must_use]
    pub fn integer_total(&self) -> Option<i128> {
        self.running.integers
    }
}

impl<T: ?Sized, R: Into<Reading>, F: Fn(&T) -> Option<R>> Aggregator<T> for Sum<T, R, F> {
    type Output = f64;

    fn filter_and_aggregate(&mut self, record: &T) {
        if let Some(value) = (self.extract)(record) {
            self.running.add(value.into());
        }
    }

    fn result(&self) -> f64 {
        self.running.sum.to_f64()
    }

    fn reset(&mut self) {
        self.running = Running::default();
    }

    fn has_data(&self) -> bool {
        self.running.count > 0
    }
}

impl<T: ?Sized, R, F: Clone> Clone for Sum<T, R, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            running: self.running,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, R, F> fmt::Debug for Sum<T, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sum")
            .field("sum", &self.running.sum)
            .field("count", &self.running.count)
            .finish_non_exhaustive()
    }
}

/// Arithmetic mean of the numeric reading of each record.
///
/// The mean of nothing is undefined, so the empty result is `None`. Large
/// finite readings never push the mean to an infinity.
pub struct Mean<T: ?Sized, R = Reading, F = fn(&T) -> Option<R>> {
    extract: F,
    running: Running,
    _marker: PhantomData<fn(&T) -> R>,
}

impl<T: Numeric> Mean<T> {
    /// Creates a mean over records that are numbers themselves.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fn(<T as Numeric>::reading)
    }
}

impl<T: Numeric> Default for Mean<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, R: Into<Reading>, F: Fn(&T) -> Option<R>> Mean<T, R, F> {
    /// Creates a mean over the reading `extract` takes from each record.
    pub fn from_fn(extract: F) -> Self {
        Self {
            extract,
            running: Running::default(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of readings averaged so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.running.count
    }
}

impl<T: ?Sized, R: Into<Reading>, F: Fn(&T) -> Option<R>> Aggregator<T> for Mean<T, R, F> {
    type Output = Option<f64>;

    fn filter_and_aggregate(&mut self, record: &T) {
        if let Some(value) = (self.extract)(record) {
            self.running.add(value.into());
        }
    }

    fn result(&self) -> Option<f64> {
        (self.running.count > 0).then(|| self.running.sum.mean(self.running.count))
    }

    fn reset(&mut self) {
        self.running = Running::default();
    }

    fn has_data(&self) -> bool {
        self.running.count > 0
    }
}

impl<T: ?Sized, R, F: Clone> Clone for Mean<T, R, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            running: self.running,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, R, F> fmt::Debug for Mean<T, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mean")
            .field("sum", &self.running.sum)
            .field("count", &self.running.count)
            .finish_non_exhaustive()
    }
}
