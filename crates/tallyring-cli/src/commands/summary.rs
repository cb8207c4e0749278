//! Whole-stream summary command.

use std::io::BufRead;

use anyhow::Result;
use serde::Serialize;

use super::{AggregateResult, DriverConfig, ReadStats};
use crate::input;
use crate::output::{self, Format};

/// Aggregates over the whole stream.
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub input: ReadStats,
    pub results: Vec<AggregateResult>,
}

/// Feeds every record of `reader` to the configured aggregators.
pub fn summarize(config: &DriverConfig, reader: impl BufRead) -> Result<SummaryOutput> {
    let mut aggregators = super::build_aggregators(config);
    let stats = super::read_records(reader, config.field.as_deref(), |record| {
        for (_, agg) in &mut aggregators {
            agg.filter_and_aggregate(&record);
        }
    })?;

    Ok(SummaryOutput {
        input: stats,
        results: super::collect_results(&aggregators),
    })
}

/// Run the summary command.
pub fn run(config: &DriverConfig) -> Result<()> {
    tracing::debug!(?config, "starting summary");
    let reader = input::open(config.input.as_deref())?;
    let summary = summarize(config, reader)?;
    tracing::info!(
        records = summary.input.records,
        lines = summary.input.lines,
        "stream summarized"
    );

    match config.format {
        Format::Json => output::print_json(&summary, config.quiet)?,
        Format::Table => {
            let items: Vec<(&str, String)> = summary
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
    use tallyring_common::types::Value;
    use tallyring_core::aggregate::{AggregateFunction, CompareOp, Comparison};

    fn config(functions: &[AggregateFunction]) -> DriverConfig {
        DriverConfig {
            functions: functions.to_vec(),
            ..DriverConfig::default()
        }
    }

    #[test]
    fn test_summary_of_plain_numbers() {
        let summary = summarize(
            &config(&AggregateFunction::ALL),
            Cursor::new("4\n2.5\nnope\n\n-1\n"),
        )
        .unwrap();

        let values: Vec<Value> = summary.results.into_iter().map(|r| r.value).collect();
        assert_eq!(
            values[..3],
            [Value::Int64(4), Value::Float64(5.5), Value::Float64(5.5 / 3.0)]
        );
        assert_eq!(values[3..], [Value::Float64(-1.0), Value::Float64(4.0), Value::Int64(-1)]);
        assert_eq!(summary.input.blank, 1);
    }

    #[test]
    fn test_summary_with_filter_and_field() {
        let mut config = config(&[AggregateFunction::Count, AggregateFunction::Max]);
        config.field = Some("v".to_string());
        config.filter = Some(Comparison::new(CompareOp::Gt, 0.0));

        let input = "{\"v\": 5}\n{\"v\": -1}\n{\"v\": 0}\n{\"w\": 9}\n{\"v\": 3}\n";
        let summary = summarize(&config, Cursor::new(input)).unwrap();

        assert_eq!(summary.results[0].value, Value::Int64(2));
        assert_eq!(summary.results[1].value, Value::Float64(5.0));
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&config(&[AggregateFunction::Avg]), Cursor::new("")).unwrap();
        assert_eq!(summary.results[0].value, Value::Null);
        assert_eq!(summary.input.records, 0);
    }
}
