//! Dynamically typed record values.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A dynamically typed record value.
///
/// This is the record type the command-line driver feeds into buffers and
/// aggregators. It maps onto JSON scalars: `null`, booleans, integers,
/// floats, and strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing or null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string, shared on clone.
    String(Arc<str>),
}

impl Value {
    /// Parses a bare text token.
    ///
    /// Tries, in order: integer, float, `true`/`false`, `null`. Anything else
    /// becomes a string. Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if let Ok(v) = text.parse::<i64>() {
            return Value::Int64(v);
        }
        if let Ok(v) = text.parse::<f64>() {
            return Value::Float64(v);
        }
        match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" | "" => Value::Null,
            _ => Value::String(text.into()),
        }
    }

    /// Returns the name of this value's type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOL",
            Value::Int64(_) => "INT64",
            Value::Float64(_) => "FLOAT64",
            Value::String(_) => "STRING",
        }
    }

    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an `Int64`.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float value, if this is a `Float64`.
    #[must_use]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        assert_eq!(Value::from_text("42"), Value::Int64(42));
        assert_eq!(Value::from_text(" -7 "), Value::Int64(-7));
        assert_eq!(Value::from_text("2.5"), Value::Float64(2.5));
        assert_eq!(Value::from_text("true"), Value::Bool(true));
        assert_eq!(Value::from_text("null"), Value::Null);
        assert_eq!(Value::from_text("sensor-a"), Value::from("sensor-a"));
    }

    #[test]
    fn test_json_roundtrip_shapes() {
        let v: Value = serde_json::from_str("3").unwrap();
        assert_eq!(v, Value::Int64(3));

        let v: Value = serde_json::from_str("3.25").unwrap();
        assert_eq!(v, Value::Float64(3.25));

        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_null());

        let v: Value = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(v.as_str(), Some("abc"));

        assert_eq!(serde_json::to_string(&Value::Int64(9)).unwrap(), "9");
    }

    #[test]
    fn test_accessors() {
        let v = Value::from(10i64);
        assert_eq!(v.as_int64(), Some(10));
        assert_eq!(v.as_float64(), None);
        assert_eq!(v.type_name(), "INT64");
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Float64(1.5).to_string(), "1.5");
        assert_eq!(Value::from("x").to_string(), "x");
    }
}
