//! # Tallyring
//!
//! Keep the last few values of a stream, and summarize the stream as it goes.
//!
//! Two small tools live here, and they don't know about each other:
//!
//! | Type | What it does |
//! | ---- | ------------ |
//! | [`BoundedBuffer`] | Holds the most recent `capacity` items, dropping the oldest on overflow |
//! | [`Aggregator`] | Folds records into a summary, skipping records it doesn't care about |
//!
//! Aggregators come in a handful of flavors ([`Count`], [`Sum`], [`Mean`],
//! [`Min`], [`Max`], [`Latest`], [`HistogramAggregator`], [`Quantile`],
//! [`Frequency`]) plus [`FunctionAggregator`] for picking one by name at
//! run time.
//!
//! ## Quick Start
//!
//! ```rust
//! use tallyring::{Aggregator, BoundedBuffer, Mean};
//!
//! // Remember the last three readings
//! let mut recent = BoundedBuffer::new(3)?;
//! for reading in [12.0, 15.5, 11.0, 14.5] {
//!     recent.append(reading);
//! }
//! assert_eq!(recent.snapshot(), vec![15.5, 11.0, 14.5]);
//!
//! // Average over what's left
//! let mut mean = Mean::<f64>::new();
//! mean.aggregate_all(&recent);
//! assert_eq!(mean.result(), Some(41.0 / 3.0));
//! # Ok::<(), tallyring::Error>(())
//! ```

// Re-export the buffer and aggregation API
pub use tallyring_core::{
    AggregateFunction, Aggregator, AggregatorExt, BoundedBuffer, CompareOp, Comparison, Count,
    Filtered, Frequency, FunctionAggregator, Histogram, HistogramAggregator, HistogramBucket,
    Latest, Max, Mean, Min, Predicate, Quantile, Sum,
};

// Re-export common types - records, numeric projection, errors
pub use tallyring_common::{Error, Numeric, Reading, Result, Value};
