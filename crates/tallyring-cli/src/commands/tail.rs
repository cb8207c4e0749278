//! Most-recent-records command.

use std::io::BufRead;

use anyhow::{Context, Result};
use serde::Serialize;
use tallyring_common::types::Value;
use tallyring_core::buffer::BoundedBuffer;

use super::{AggregateResult, DriverConfig, ReadStats};
use crate::input;
use crate::output::{self, Format};

/// The retained records and the aggregates over them.
#[derive(Debug, Serialize)]
pub struct TailOutput {
    pub input: ReadStats,
    pub capacity: usize,
    pub evicted: u64,
    pub records: Vec<Value>,
    pub results: Vec<AggregateResult>,
}

/// Keeps the last `capacity` records of `reader` and aggregates the snapshot.
pub fn tail(config: &DriverConfig, reader: impl BufRead) -> Result<TailOutput> {
    let capacity = config.capacity.context("tail needs a capacity")?;
    let mut buffer = BoundedBuffer::new(capacity)?;

    let stats = super::read_records(reader, config.field.as_deref(), |record| {
        buffer.append(record);
    })?;

    let records = buffer.snapshot();
    let mut aggregators = super::build_aggregators(config);
    for (_, agg) in &mut aggregators {
        for record in &records {
            agg.filter_and_aggregate(record);
        }
    }

    Ok(TailOutput {
        input: stats,
        capacity: buffer.capacity(),
        evicted: buffer.evicted(),
        records,
        results: super::collect_results(&aggregators),
    })
}

/// Run the tail command.
pub fn run(config: &DriverConfig) -> Result<()> {
    tracing::debug!(?config, "starting tail");
    let reader = input::open(config.input.as_deref())?;
    let tail = tail(config, reader)?;
    tracing::info!(
        kept = tail.records.len(),
        evicted = tail.evicted,
        "stream tailed"
    );

    match config.format {
        Format::Json => output::print_json(&tail, config.quiet)?,
        Format::Table => {
            output::print_records_table(&tail.records, config.quiet);
            let items: Vec<(&str, String)> = tail
                .results
                .iter()
                .map(|r| (r.function.as_str(), r.value.to_string()))
                .collect();
            output::print_key_value_table(&["Function", "Value"], &items, config.quiet);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tallyring_core::aggregate::AggregateFunction;

    fn config(capacity: usize) -> DriverConfig {
        DriverConfig {
            capacity: Some(capacity),
            functions: vec![AggregateFunction::Count, AggregateFunction::Last],
            ..DriverConfig::default()
        }
    }

    #[test]
    fn test_keeps_most_recent() {
        let tail = tail(&config(3), Cursor::new("A\nB\nC\nD\n")).unwrap();

        assert_eq!(
            tail.records,
            vec![Value::from("B"), Value::from("C"), Value::from("D")]
        );
        assert_eq!(tail.evicted, 1);
        assert_eq!(tail.results[0].value, Value::Int64(3));
        assert_eq!(tail.results[1].value, Value::from("D"));
    }

    #[test]
    fn test_capacity_one_is_latest_wins() {
        let tail = tail(&config(1), Cursor::new("X\nY\n")).unwrap();
        assert_eq!(tail.records, vec![Value::from("Y")]);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = tail(&config(0), Cursor::new("1\n")).unwrap_err();
        assert!(err.to_string().contains("capacity must be positive"));
    }

    #[test]
    fn test_json_output_shape() {
        let tail = tail(&config(2), Cursor::new("1\n2\n3\n")).unwrap();
        let json = serde_json::to_value(&tail).unwrap();

        assert_eq!(json["records"], serde_json::json!([2, 3]));
        assert_eq!(json["results"][0]["function"], "count");
        assert_eq!(json["input"]["records"], 3);
    }
}
