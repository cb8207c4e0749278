//! Fixed-boundary histograms.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use tallyring_common::types::Numeric;
use tallyring_common::utils::error::{Error, Result};

use super::Aggregator;

/// A single histogram bucket covering `[lower, upper)`.
///
/// The last bucket of a histogram is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound (exclusive, except for the last bucket).
    pub upper: f64,
    /// Number of values in the bucket.
    pub count: u64,
}

/// Bucketed counts produced by a [`HistogramAggregator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    buckets: Vec<HistogramBucket>,
}

impl Histogram {
    /// Returns the buckets in ascending order.
    #[must_use]
    pub fn buckets(&self) -> &[HistogramBucket] {
        &self.buckets
    }

    /// Returns the total number of counted values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Returns the bucket with the highest count (the first one on ties).
    #[must_use]
    pub fn mode(&self) -> Option<&HistogramBucket> {
        self.buckets
            .iter()
            .filter(|b| b.count > 0)
            .fold(None, |best: Option<&HistogramBucket>, b| match best {
                Some(current) if current.count >= b.count => Some(current),
                _ => Some(b),
            })
    }
}

/// Counts numeric readings into buckets with fixed boundaries.
///
/// Boundaries `[b0, b1, ..., bn]` define `n` buckets. Values below `b0` or
/// above `bn` are out of range and skipped, as are records without a
/// reading. The empty result has every bucket at zero.
pub struct HistogramAggregator<T: ?Sized, F = fn(&T) -> Option<f64>> {
    extract: F,
    boundaries: Vec<f64>,
    counts: Vec<u64>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Numeric> HistogramAggregator<T> {
    /// Creates a histogram over records that are numbers themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `boundaries` holds at
    /// least two finite, strictly increasing values.
    pub fn new(boundaries: Vec<f64>) -> Result<Self> {
        Self::from_fn(boundaries, <T as Numeric>::to_f64)
    }

    /// Creates a histogram of `buckets` equal-width buckets over
    /// `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `buckets` is zero or the
    /// range is empty or not finite.
    pub fn uniform(lower: f64, upper: f64, buckets: usize) -> Result<Self> {
        Self::new(uniform_boundaries(lower, upper, buckets)?)
    }
}

impl<T: ?Sized, F: Fn(&T) -> Option<f64>> HistogramAggregator<T, F> {
    /// Creates a histogram over the reading `extract` takes from each record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `boundaries` holds at
    /// least two finite, strictly increasing values.
    pub fn from_fn(boundaries: Vec<f64>, extract: F) -> Result<Self> {
        validate_boundaries(&boundaries)?;
        let counts = vec![0; boundaries.len() - 1];
        Ok(Self {
            extract,
            boundaries,
            counts,
            _marker: PhantomData,
        })
    }

    /// Returns the bucket boundaries.
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    fn bucket_index(&self, value: f64) -> Option<usize> {
        let first = *self.boundaries.first()?;
        let last = *self.boundaries.last()?;
        if !(first..=last).contains(&value) {
            return None;
        }
        if value == last {
            return Some(self.counts.len() - 1);
        }
        Some(self.boundaries.partition_point(|b| *b <= value) - 1)
    }
}

fn validate_boundaries(boundaries: &[f64]) -> Result<()> {
    if boundaries.len() < 2 {
        return Err(Error::invalid_configuration(format!(
            "histogram needs at least two boundaries, got {}",
            boundaries.len()
        )));
    }
    if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
        return Err(Error::invalid_configuration(format!(
            "histogram boundary must be finite, got {bad}"
        )));
    }
    if let Some(pair) = boundaries.windows(2).find(|w| w[0] >= w[1]) {
        return Err(Error::invalid_configuration(format!(
            "histogram boundaries must be strictly increasing, got {} then {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

fn uniform_boundaries(lower: f64, upper: f64, buckets: usize) -> Result<Vec<f64>> {
    if buckets == 0 {
        return Err(Error::invalid_configuration(
            "histogram needs at least one bucket",
        ));
    }
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(Error::invalid_configuration(format!(
            "histogram range [{lower}, {upper}] is empty or not finite"
        )));
    }
    let width = (upper - lower) / buckets as f64;
    let mut boundaries: Vec<f64> = (0..buckets).map(|i| lower + width * i as f64).collect();
    boundaries.push(upper);
    Ok(boundaries)
}

impl<T: ?Sized, F: Fn(&T) -> Option<f64>> Aggregator<T> for HistogramAggregator<T, F> {
    type Output = Histogram;

    fn filter_and_aggregate(&mut self, record: &T) {
        let index = (self.extract)(record).and_then(|value| self.bucket_index(value));
        if let Some(index) = index {
            self.counts[index] += 1;
        }
    }

    fn result(&self) -> Histogram {
        let buckets = self
            .boundaries
            .windows(2)
            .zip(&self.counts)
            .map(|(bounds, &count)| HistogramBucket {
                lower: bounds[0],
                upper: bounds[1],
                count,
            })
            .collect();
        Histogram { buckets }
    }

    fn reset(&mut self) {
        self.counts.fill(0);
    }

    fn has_data(&self) -> bool {
        self.counts.iter().any(|&c| c > 0)
    }
}

impl<T: ?Sized, F: Clone> Clone for HistogramAggregator<T, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            boundaries: self.boundaries.clone(),
            counts: self.counts.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F> fmt::Debug for HistogramAggregator<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistogramAggregator")
            .field("boundaries", &self.boundaries)
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(histogram: &Histogram) -> Vec<u64> {
        histogram.buckets().iter().map(|b| b.count).collect()
    }

    #[test]
    fn test_rejects_bad_boundaries() {
        assert!(HistogramAggregator::<f64>::new(vec![1.0]).is_err());
        assert!(HistogramAggregator::<f64>::new(vec![0.0, 0.0]).is_err());
        assert!(HistogramAggregator::<f64>::new(vec![2.0, 1.0]).is_err());
        assert!(HistogramAggregator::<f64>::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(HistogramAggregator::<f64>::uniform(0.0, 10.0, 0).is_err());
        assert!(HistogramAggregator::<f64>::uniform(5.0, 5.0, 2).is_err());
    }

    #[test]
    fn test_empty_histogram_is_all_zero() {
        let hist = HistogramAggregator::<f64>::new(vec![0.0, 1.0, 2.0]).unwrap();
        let result = hist.result();
        assert_eq!(counts(&result), vec![0, 0]);
        assert_eq!(result.total(), 0);
        assert_eq!(result.mode(), None);
        assert!(!hist.has_data());
    }

    #[test]
    fn test_bucket_edges() {
        let mut hist = HistogramAggregator::<f64>::new(vec![0.0, 10.0, 20.0]).unwrap();
        hist.aggregate_all(&[0.0, 9.99, 10.0, 20.0, -0.1, 20.1, f64::NAN]);

        let result = hist.result();
        assert_eq!(counts(&result), vec![2, 2]);
        assert_eq!(result.buckets()[1].lower, 10.0);
        assert_eq!(result.buckets()[1].upper, 20.0);
    }

    #[test]
    fn test_uniform_buckets() {
        let mut hist = HistogramAggregator::<i32>::uniform(0.0, 100.0, 4).unwrap();
        assert_eq!(hist.boundaries(), &[0.0, 25.0, 50.0, 75.0, 100.0]);

        hist.aggregate_all(&[1, 30, 31, 99, 100]);
        let result = hist.result();
        assert_eq!(counts(&result), vec![1, 2, 0, 2]);
        assert_eq!(result.mode().map(|b| b.lower), Some(25.0));
    }

    #[test]
    fn test_reset_zeroes_counts() {
        let mut hist = HistogramAggregator::<u8>::new(vec![0.0, 5.0]).unwrap();
        hist.filter_and_aggregate(&3);
        assert!(hist.has_data());

        hist.reset();
        assert_eq!(counts(&hist.result()), vec![0]);
        assert!(!hist.has_data());
    }
}
