//! Relevance predicates and the filtering adapter.

use std::fmt;
use std::str::FromStr;

use tallyring_common::types::Numeric;

use super::{Aggregator, ParseError};

/// Decides whether a record is relevant to an aggregation.
///
/// Implemented for every `Fn(&T) -> bool`, so plain closures work.
pub trait Predicate<T: ?Sized> {
    /// Returns true if `record` should be aggregated.
    fn test(&self, record: &T) -> bool;
}

impl<T: ?Sized, F: Fn(&T) -> bool> Predicate<T> for F {
    fn test(&self, record: &T) -> bool {
        self(record)
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    /// Applies the operator as `left <op> right`.
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => (left - right).abs() < f64::EPSILON,
            CompareOp::Ne => (left - right).abs() >= f64::EPSILON,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }

    /// Returns the symbolic form of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "==" | "=" | "eq" => Ok(CompareOp::Eq),
            "!=" | "<>" | "ne" => Ok(CompareOp::Ne),
            "<" | "lt" => Ok(CompareOp::Lt),
            "<=" | "le" => Ok(CompareOp::Le),
            ">" | "gt" => Ok(CompareOp::Gt),
            ">=" | "ge" => Ok(CompareOp::Ge),
            other => Err(ParseError::UnknownOperator(other.to_string())),
        }
    }
}

/// Compares the numeric reading of a record against a fixed threshold.
///
/// Records without a numeric reading never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    op: CompareOp,
    threshold: f64,
}

impl Comparison {
    /// Creates a new comparison predicate.
    #[must_use]
    pub fn new(op: CompareOp, threshold: f64) -> Self {
        Self { op, threshold }
    }

    /// Returns the comparison operator.
    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Returns the threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<T: Numeric + ?Sized> Predicate<T> for Comparison {
    fn test(&self, record: &T) -> bool {
        record
            .to_f64()
            .is_some_and(|value| self.op.apply(value, self.threshold))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.threshold)
    }
}

/// Operators recognised in compact form, longest first so `>=` wins over `>`.
const SYMBOLS: [&str; 8] = [">=", "<=", "!=", "==", "<>", ">", "<", "="];

impl FromStr for Comparison {
    type Err = ParseError;

    /// Parses `>0`, `>= 2.5`, `ne:3`, or `gt:0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (op, rest) = match SYMBOLS.iter().find(|sym| s.starts_with(**sym)) {
            Some(sym) => (sym.parse::<CompareOp>()?, &s[sym.len()..]),
            None => {
                let (word, rest) = s
                    .split_once(':')
                    .ok_or_else(|| ParseError::UnknownOperator(s.to_string()))?;
                (word.parse::<CompareOp>()?, rest)
            }
        };

        let rest = rest.trim();
        let threshold = rest
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| ParseError::InvalidThreshold(rest.to_string()))?;

        Ok(Self::new(op, threshold))
    }
}

/// Passes only records accepted by a predicate to the wrapped aggregator.
#[derive(Debug, Clone)]
pub struct Filtered<A, P> {
    inner: A,
    predicate: P,
}

impl<A, P> Filtered<A, P> {
    /// Wraps `inner` so it only sees records accepted by `predicate`.
    pub fn new(inner: A, predicate: P) -> Self {
        Self { inner, predicate }
    }

    /// Returns the wrapped aggregator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Unwraps the adapter.
    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<T, A, P> Aggregator<T> for Filtered<A, P>
where
    T: ?Sized,
    A: Aggregator<T>,
    P: Predicate<T>,
{
    type Output = A::Output;

    fn filter_and_aggregate(&mut self, record: &T) {
        if self.predicate.test(record) {
            self.inner.filter_and_aggregate(record);
        }
    }

    fn result(&self) -> Self::Output {
        self.inner.result()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn has_data(&self) -> bool {
        self.inner.has_data()
    }
}
