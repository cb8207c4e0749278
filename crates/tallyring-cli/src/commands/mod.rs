//! CLI command implementations.

pub mod summary;
pub mod tail;

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tallyring_common::types::Value;
use tallyring_core::aggregate::{
    AggregateFunction, Aggregator, AggregatorExt, Comparison, FunctionAggregator,
};

use crate::input;
use crate::output::Format;

/// Everything a command needs to know, collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Input file; stdin when absent.
    pub input: Option<PathBuf>,
    /// Number of records to keep (tail only).
    pub capacity: Option<usize>,
    /// Field to read from object records.
    pub field: Option<String>,
    /// Only aggregate records matching this comparison.
    pub filter: Option<Comparison>,
    /// Functions to compute, in output order.
    pub functions: Vec<AggregateFunction>,
    /// Output format.
    pub format: Format,
    /// Suppress output.
    pub quiet: bool,
}

/// Result of one aggregate function.
#[derive(Debug, Serialize, PartialEq)]
pub struct AggregateResult {
    pub function: String,
    pub value: Value,
}

/// Line counters for one pass over the input.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ReadStats {
    pub lines: u64,
    pub records: u64,
    pub blank: u64,
}

type BoxedAggregator = Box<dyn Aggregator<Value, Output = Value>>;

/// Builds one aggregator per configured function, applying the filter.
pub(crate) fn build_aggregators(config: &DriverConfig) -> Vec<(AggregateFunction, BoxedAggregator)> {
    config
        .functions
        .iter()
        .map(|&function| {
            let agg = FunctionAggregator::new(function);
            let boxed = match config.filter {
                Some(comparison) => agg.filter(comparison).boxed(),
                None => agg.boxed(),
            };
            (function, boxed)
        })
        .collect()
}

pub(crate) fn collect_results(
    aggregators: &[(AggregateFunction, BoxedAggregator)],
) -> Vec<AggregateResult> {
    aggregators
        .iter()
        .map(|(function, agg)| AggregateResult {
            function: function.to_string(),
            value: agg.result(),
        })
        .collect()
}

/// Decodes every line of `reader` and hands each record to `sink`.
pub(crate) fn read_records(
    reader: impl BufRead,
    field: Option<&str>,
    mut sink: impl FnMut(Value),
) -> Result<ReadStats> {
    let mut stats = ReadStats::default();
    for line in reader.lines() {
        stats.lines += 1;
        let line = line.with_context(|| format!("failed to read line {}", stats.lines))?;
        match input::parse_line(&line, field) {
            Some(record) => {
                stats.records += 1;
                sink(record);
            }
            None => {
                tracing::debug!(line = stats.lines, "skipping blank line");
                stats.blank += 1;
            }
        }
    }
    Ok(stats)
}
