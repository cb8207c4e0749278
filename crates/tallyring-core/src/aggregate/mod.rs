//! The filter-and-aggregate protocol.
//!
//! An [`Aggregator`] ingests records one at a time and yields a summary on
//! demand. The driving loop never needs to know which summary it computes:
//!
//! - [`Count`] - Number of accepted records
//! - [`Sum`], [`Mean`] - Running numeric totals
//! - [`Min`], [`Max`] - Extremes of an extracted value
//! - [`Latest`] - Most recently accepted value (order-sensitive)
//! - [`HistogramAggregator`] - Bucketed counts over fixed boundaries
//! - [`Quantile`] - Exact nearest-rank quantile
//! - [`Frequency`] - Occurrences per distinct key
//! - [`FunctionAggregator`] - Run-time selected function over [`Value`] records
//!
//! Relevance filtering is either built into an aggregator (extractors return
//! `None` for records they cannot read) or layered on with [`Filtered`].
//!
//! # Empty results
//!
//! Every aggregator defines what [`Aggregator::result`] returns before any
//! record was accepted. Where the summary is undefined for zero inputs
//! (mean, extremes, quantiles, latest) the output is an `Option` and the
//! empty result is `None`, never a stand-in number.
//!
//! # Example
//!
//! ```
//! use tallyring_core::aggregate::{Aggregator, AggregatorExt, Count};
//!
//! let mut positives = Count::<i64>::new().filter(|v: &i64| *v > 0);
//! positives.aggregate_all(&[5, -1, 0, 3]);
//! assert_eq!(positives.result(), 2);
//! ```
//!
//! [`Value`]: tallyring_common::types::Value

mod count;
mod exact;
mod extrema;
mod frequency;
mod function;
mod histogram;
mod numeric;
mod predicate;
mod quantile;

pub use count::Count;
pub use extrema::{Latest, Max, Min};
pub use frequency::Frequency;
pub use function::{AggregateFunction, FunctionAggregator};
pub use histogram::{Histogram, HistogramAggregator, HistogramBucket};
pub use numeric::{Mean, Sum};
pub use predicate::{CompareOp, Comparison, Filtered, Predicate};
pub use quantile::Quantile;

use thiserror::Error;

/// Error parsing an aggregate function or filter from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown aggregate function name.
    #[error("unknown aggregate function: {0}")]
    UnknownFunction(String),
    /// Unknown comparison operator.
    #[error("unknown comparison operator: {0}")]
    UnknownOperator(String),
    /// Threshold is not a finite number.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

impl From<ParseError> for tallyring_common::Error {
    fn from(err: ParseError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

/// A stateful strategy that folds records of type `T` into a summary.
///
/// Implementations own their accumulator state and are driven by an
/// external loop. None of the methods block, fail, or panic for any record.
///
/// An aggregator is in one of two states: no data yet, or has data. It moves
/// to the second on the first accepted record and only goes back on
/// [`reset`](Aggregator::reset).
pub trait Aggregator<T: ?Sized> {
    /// The summary type produced by [`result`](Aggregator::result).
    type Output;

    /// Folds `record` into the accumulator if it is relevant.
    ///
    /// Irrelevant or malformed records are silently skipped.
    fn filter_and_aggregate(&mut self, record: &T);

    /// Returns the summary of all accepted records.
    ///
    /// Pure and deterministic: repeated calls without intervening records
    /// return equal values.
    fn result(&self) -> Self::Output;

    /// Discards all accumulated state.
    fn reset(&mut self);

    /// Returns true once at least one record has been accepted.
    fn has_data(&self) -> bool;

    /// Feeds every record of `records` in order.
    fn aggregate_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
        Self: Sized,
    {
        for record in records {
            self.filter_and_aggregate(record);
        }
    }
}

impl<T: ?Sized, A: Aggregator<T> + ?Sized> Aggregator<T> for Box<A> {
    type Output = A::Output;

    fn filter_and_aggregate(&mut self, record: &T) {
        (**self).filter_and_aggregate(record);
    }

    fn result(&self) -> Self::Output {
        (**self).result()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn has_data(&self) -> bool {
        (**self).has_data()
    }
}

/// Combinators available on every [`Aggregator`].
pub trait AggregatorExt<T: ?Sized>: Aggregator<T> + Sized {
    /// Only passes records accepted by `predicate` to this aggregator.
    fn filter<P: Predicate<T>>(self, predicate: P) -> Filtered<Self, P> {
        Filtered::new(self, predicate)
    }

    /// Boxes this aggregator for dynamic dispatch.
    fn boxed<'a>(self) -> Box<dyn Aggregator<T, Output = Self::Output> + 'a>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<T: ?Sized, A: Aggregator<T>> AggregatorExt<T> for A {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_count_scenario() {
        let mut positives = Count::<i64>::new().filter(|v: &i64| *v > 0);
        for v in [5, -1, 0, 3] {
            positives.filter_and_aggregate(&v);
        }
        assert_eq!(positives.result(), 2);
    }

    #[test]
    fn test_boxed_aggregators_share_a_loop() {
        let mut aggregators: Vec<Box<dyn Aggregator<f64, Output = Option<f64>>>> = vec![
            Min::<f64>::new().boxed(),
            Max::<f64>::new().boxed(),
            Mean::<f64>::new().boxed(),
        ];

        for reading in [3.0, 9.0, 6.0] {
            for agg in &mut aggregators {
                agg.filter_and_aggregate(&reading);
            }
        }

        let results: Vec<_> = aggregators.iter().map(|a| a.result()).collect();
        assert_eq!(results, vec![Some(3.0), Some(9.0), Some(6.0)]);
    }

    #[test]
    fn test_box_forwards_reset() {
        let mut agg = Count::<u8>::new().boxed();
        agg.filter_and_aggregate(&1);
        assert!(agg.has_data());

        agg.reset();
        assert!(!agg.has_data());
        assert_eq!(agg.result(), 0);
    }

    #[test]
    fn test_parse_error_converts_to_configuration_error() {
        let err: tallyring_common::Error =
            ParseError::UnknownFunction("stddev".to_string()).into();
        assert_eq!(
            err,
            tallyring_common::Error::InvalidConfiguration(
                "unknown aggregate function: stddev".to_string()
            )
        );
    }
}
