//! # tallyring-core
//!
//! Core layer for Tallyring: bounded buffers and stream aggregation.
//!
//! Both utilities are independent. Neither holds a reference to the other;
//! a driver composes them by pushing records into a buffer, an aggregator,
//! or both, and decides whether aggregation runs over the live buffer, a
//! snapshot of it, or an unbounded stream.
//!
//! ## Modules
//!
//! - [`buffer`] - Fixed-capacity, insertion-ordered ring buffer
//! - [`aggregate`] - The filter-and-aggregate protocol and its strategies
//!
//! ## Concurrency
//!
//! Everything here is synchronous and lock-free in the trivial sense: there
//! are no locks at all. Sharing one buffer or aggregator between threads
//! requires external mutual exclusion (for example a writer lock around
//! `append`, with readers working on a `snapshot`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod buffer;

// Re-export commonly used types
pub use aggregate::{
    AggregateFunction, Aggregator, AggregatorExt, CompareOp, Comparison, Count, Filtered,
    Frequency, FunctionAggregator, Histogram, HistogramAggregator, HistogramBucket, Latest, Max,
    Mean, Min, Predicate, Quantile, Sum,
};
pub use buffer::BoundedBuffer;
