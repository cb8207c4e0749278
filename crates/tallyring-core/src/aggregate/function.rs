//! Run-time selected aggregate functions over [`Value`] records.

use std::fmt;
use std::str::FromStr;

use tallyring_common::types::Value;

use super::{Aggregator, AggregatorExt, Count, Filtered, Latest, Max, Mean, Min, ParseError, Sum};

/// Aggregate function selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// Number of non-null records.
    Count,
    /// Sum of numeric records.
    Sum,
    /// Mean of numeric records.
    Avg,
    /// Smallest numeric record.
    Min,
    /// Largest numeric record.
    Max,
    /// Most recent non-null record.
    Last,
}

impl AggregateFunction {
    /// All functions, in display order.
    pub const ALL: [AggregateFunction; 6] = [
        AggregateFunction::Count,
        AggregateFunction::Sum,
        AggregateFunction::Avg,
        AggregateFunction::Min,
        AggregateFunction::Max,
        AggregateFunction::Last,
    ];

    /// Returns the lowercase name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Last => "last",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFunction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateFunction::Count),
            "sum" => Ok(AggregateFunction::Sum),
            "avg" | "mean" => Ok(AggregateFunction::Avg),
            "min" => Ok(AggregateFunction::Min),
            "max" => Ok(AggregateFunction::Max),
            "last" | "latest" => Ok(AggregateFunction::Last),
            other => Err(ParseError::UnknownFunction(other.to_string())),
        }
    }
}

fn is_present(value: &Value) -> bool {
    !value.is_null()
}

fn present_value(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

/// Per-function accumulator state.
#[derive(Debug, Clone)]
enum FunctionState {
    Count(Filtered<Count<Value>, fn(&Value) -> bool>),
    Sum(Sum<Value>),
    Avg(Mean<Value>),
    Min(Min<Value>),
    Max(Max<Value>),
    Last(Latest<Value>),
}

/// Aggregates [`Value`] records with a function chosen at run time.
///
/// Results are reported as [`Value`]s:
///
/// | Function | Result | Empty result |
/// |----------|--------|--------------|
/// | `count` | `Int64` | `Int64(0)` |
/// | `sum` | `Int64` if every record was an integer, else `Float64` | `Float64(0.0)` |
/// | `avg`, `min`, `max` | `Float64` | `Null` |
/// | `last` | the record | `Null` |
///
/// Numeric functions skip records without a numeric reading; `count` and
/// `last` skip nulls.
#[derive(Debug, Clone)]
pub struct FunctionAggregator {
    function: AggregateFunction,
    state: FunctionState,
}

impl FunctionAggregator {
    /// Creates an aggregator for `function`.
    #[must_use]
    pub fn new(function: AggregateFunction) -> Self {
        let state = match function {
            AggregateFunction::Count => {
                FunctionState::Count(Count::new().filter(is_present as fn(&Value) -> bool))
            }
            AggregateFunction::Sum => FunctionState::Sum(Sum::new()),
            AggregateFunction::Avg => FunctionState::Avg(Mean::new()),
            AggregateFunction::Min => FunctionState::Min(Min::new()),
            AggregateFunction::Max => FunctionState::Max(Max::new()),
            AggregateFunction::Last => {
                FunctionState::Last(Latest::from_fn(
                    present_value as fn(&Value) -> Option<Value>,
                ))
            }
        };
        Self { function, state }
    }

    /// Returns the function this aggregator computes.
    #[must_use]
    pub fn function(&self) -> AggregateFunction {
        self.function
    }
}

impl Aggregator<Value> for FunctionAggregator {
    type Output = Value;

    fn filter_and_aggregate(&mut self, record: &Value) {
        match &mut self.state {
            FunctionState::Count(agg) => agg.filter_and_aggregate(record),
            FunctionState::Sum(agg) => agg.filter_and_aggregate(record),
            FunctionState::Avg(agg) => agg.filter_and_aggregate(record),
            FunctionState::Min(agg) => agg.filter_and_aggregate(record),
            FunctionState::Max(agg) => agg.filter_and_aggregate(record),
            FunctionState::Last(agg) => agg.filter_and_aggregate(record),
        }
    }

    fn result(&self) -> Value {
        match &self.state {
            FunctionState::Count(agg) => {
                Value::Int64(i64::try_from(agg.result()).unwrap_or(i64::MAX))
            }
            FunctionState::Sum(agg) => match agg.integer_total() {
                Some(total) if agg.has_data() => i64::try_from(total)
                    .map_or_else(|_| Value::Float64(agg.result()), Value::Int64),
                _ => Value::Float64(agg.result()),
            },
            FunctionState::Avg(agg) => agg.result().into(),
            FunctionState::Min(agg) => agg.result().into(),
            FunctionState::Max(agg) => agg.result().into(),
            FunctionState::Last(agg) => agg.result().unwrap_or_default(),
        }
    }

    fn reset(&mut self) {
        match &mut self.state {
            FunctionState::Count(agg) => agg.reset(),
            FunctionState::Sum(agg) => agg.reset(),
            FunctionState::Avg(agg) => agg.reset(),
            FunctionState::Min(agg) => agg.reset(),
            FunctionState::Max(agg) => agg.reset(),
            FunctionState::Last(agg) => agg.reset(),
        }
    }

    fn has_data(&self) -> bool {
        match &self.state {
            FunctionState::Count(agg) => agg.has_data(),
            FunctionState::Sum(agg) => agg.has_data(),
            FunctionState::Avg(agg) => agg.has_data(),
            FunctionState::Min(agg) => agg.has_data(),
            FunctionState::Max(agg) => agg.has_data(),
            FunctionState::Last(agg) => agg.has_data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallyring_common::types::Numeric;

    fn records() -> Vec<Value> {
        vec![
            Value::Int64(4),
            Value::Null,
            Value::Float64(2.5),
            Value::from("n/a"),
            Value::Int64(-1),
        ]
    }

    fn run(function: AggregateFunction, records: &[Value]) -> Value {
        let mut agg = FunctionAggregator::new(function);
        agg.aggregate_all(records);
        agg.result()
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("COUNT".parse(), Ok(AggregateFunction::Count));
        assert_eq!("mean".parse(), Ok(AggregateFunction::Avg));
        assert_eq!("latest".parse(), Ok(AggregateFunction::Last));
        assert_eq!(
            "median".parse::<AggregateFunction>(),
            Err(ParseError::UnknownFunction("median".to_string()))
        );
        for function in AggregateFunction::ALL {
            assert_eq!(function.name().parse(), Ok(function));
        }
    }

    #[test]
    fn test_functions_over_mixed_records() {
        let records = records();
        assert_eq!(run(AggregateFunction::Count, &records), Value::Int64(4));
        assert_eq!(run(AggregateFunction::Sum, &records), Value::Float64(5.5));
        assert_eq!(run(AggregateFunction::Min, &records), Value::Float64(-1.0));
        assert_eq!(run(AggregateFunction::Max, &records), Value::Float64(4.0));
        assert_eq!(run(AggregateFunction::Last, &records), Value::Int64(-1));

        let avg = run(AggregateFunction::Avg, &records).as_float64().unwrap();
        assert!((avg - 5.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_integer_sum_stays_exact() {
        let big = 9_007_199_254_740_993;
        assert_eq!(
            run(AggregateFunction::Sum, &[Value::Int64(big)]),
            Value::Int64(big)
        );
        assert_eq!(
            run(AggregateFunction::Sum, &[Value::Int64(3), Value::Null, Value::Int64(-5)]),
            Value::Int64(-2)
        );
        assert_eq!(
            run(AggregateFunction::Sum, &[Value::Int64(i64::MAX), Value::Int64(1)]),
            Value::Float64(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn test_avg_of_huge_values_is_finite() {
        let records = [Value::Float64(f64::MAX), Value::Float64(f64::MAX)];
        assert_eq!(run(AggregateFunction::Avg, &records), Value::Float64(f64::MAX));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(run(AggregateFunction::Count, &[]), Value::Int64(0));
        assert_eq!(run(AggregateFunction::Sum, &[]), Value::Float64(0.0));
        assert_eq!(run(AggregateFunction::Avg, &[]), Value::Null);
        assert_eq!(run(AggregateFunction::Min, &[]), Value::Null);
        assert_eq!(run(AggregateFunction::Max, &[Value::Null]), Value::Null);
        assert_eq!(run(AggregateFunction::Last, &[Value::Null]), Value::Null);
    }

    #[test]
    fn test_reset() {
        let mut agg = FunctionAggregator::new(AggregateFunction::Max);
        agg.filter_and_aggregate(&Value::Int64(9));
        assert!(agg.has_data());
        assert_eq!(agg.result().to_f64(), Some(9.0));

        agg.reset();
        assert!(!agg.has_data());
        assert_eq!(agg.result(), Value::Null);
        assert_eq!(agg.function(), AggregateFunction::Max);
    }
}
