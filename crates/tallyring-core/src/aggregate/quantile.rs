//! Exact quantiles.

use std::fmt;
use std::marker::PhantomData;

use tallyring_common::types::Numeric;
use tallyring_common::utils::error::{Error, Result};

use super::Aggregator;

/// Nearest-rank quantile of the numeric readings.
///
/// Keeps every accepted reading, so memory grows with the stream; feed it a
/// [`BoundedBuffer`](crate::buffer::BoundedBuffer) snapshot to bound it.
/// The quantile of nothing is undefined, so the empty result is `None`.
pub struct Quantile<T: ?Sized, F = fn(&T) -> Option<f64>> {
    extract: F,
    q: f64,
    values: Vec<f64>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Numeric> Quantile<T> {
    /// Creates a `q`-quantile over records that are numbers themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0.0 <= q <= 1.0`.
    pub fn new(q: f64) -> Result<Self> {
        Self::from_fn(q, <T as Numeric>::to_f64)
    }

    /// Creates a median over records that are numbers themselves.
    #[must_use]
    pub fn median() -> Self {
        Self {
            extract: <T as Numeric>::to_f64,
            q: 0.5,
            values: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F: Fn(&T) -> Option<f64>> Quantile<T, F> {
    /// Creates a `q`-quantile over the reading `extract` takes from each
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0.0 <= q <= 1.0`.
    pub fn from_fn(q: f64, extract: F) -> Result<Self> {
        if !(0.0..=1.0).contains(&q) {
            return Err(Error::invalid_configuration(format!(
                "quantile must be within [0, 1], got {q}"
            )));
        }
        Ok(Self {
            extract,
            q,
            values: Vec::new(),
            _marker: PhantomData,
        })
    }

    /// Returns the requested quantile.
    #[must_use]
    pub fn q(&self) -> f64 {
        self.q
    }
}

impl<T: ?Sized, F: Fn(&T) -> Option<f64>> Aggregator<T> for Quantile<T, F> {
    type Output = Option<f64>;

    fn filter_and_aggregate(&mut self, record: &T) {
        if let Some(value) = (self.extract)(record).filter(|v| v.is_finite()) {
            self.values.push(value);
        }
    }

    fn result(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_unstable_by(f64::total_cmp);

        let n = sorted.len();
        let rank = ((self.q * n as f64).ceil() as usize).clamp(1, n);
        Some(sorted[rank - 1])
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn has_data(&self) -> bool {
        !self.values.is_empty()
    }
}

impl<T: ?Sized, F: Clone> Clone for Quantile<T, F> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
            q: self.q,
            values: self.values.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, F> fmt::Debug for Quantile<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantile")
            .field("q", &self.q)
            .field("len", &self.values.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Quantile::<f64>::new(-0.1).is_err());
        assert!(Quantile::<f64>::new(1.5).is_err());
        assert!(Quantile::<f64>::new(f64::NAN).is_err());
        assert!(Quantile::<f64>::new(0.0).is_ok());
        assert!(Quantile::<f64>::new(1.0).is_ok());
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(Quantile::<i32>::median().result(), None);
    }

    #[test]
    fn test_nearest_rank() {
        let values = [15, 20, 35, 40, 50];
        let mut p30 = Quantile::<i32>::new(0.3).unwrap();
        let mut p100 = Quantile::<i32>::new(1.0).unwrap();
        let mut p0 = Quantile::<i32>::new(0.0).unwrap();
        p30.aggregate_all(&values);
        p100.aggregate_all(&values);
        p0.aggregate_all(&values);

        assert_eq!(p30.result(), Some(20.0));
        assert_eq!(p100.result(), Some(50.0));
        assert_eq!(p0.result(), Some(15.0));
    }

    #[test]
    fn test_median_ignores_order() {
        let mut forward = Quantile::<i32>::median();
        let mut backward = Quantile::<i32>::median();
        forward.aggregate_all(&[1, 2, 3, 4]);
        backward.aggregate_all(&[4, 3, 2, 1]);

        assert_eq!(forward.result(), Some(2.0));
        assert_eq!(forward.result(), backward.result());
    }
}
