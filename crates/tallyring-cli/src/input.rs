//! Record decoding for line-oriented input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tallyring_common::types::Value;

/// Opens `path` for line reading, or stdin when there is no path.
pub fn open(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Decodes one input line into a record.
///
/// Returns `None` for blank lines. JSON objects yield the value under
/// `field` (null when absent); other JSON values are taken as they are.
/// Lines that are not JSON are parsed as bare text.
pub fn parse_line(line: &str, field: Option<&str>) -> Option<Value> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if !looks_like_json(line) {
        return Some(Value::from_text(line));
    }

    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(serde_json::Value::Object(mut object)) => {
            let Some(field) = field else {
                tracing::debug!("object record without --field, treating as null");
                return Some(Value::Null);
            };
            Some(object.remove(field).map_or(Value::Null, scalar))
        }
        Ok(json) => Some(scalar(json)),
        Err(e) => {
            tracing::warn!("line is not valid JSON ({e}), reading it as text");
            Some(Value::from_text(line))
        }
    }
}

fn looks_like_json(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b'{' | b'[' | b'"'))
}

/// Converts a JSON value to a record; arrays and objects become null.
fn scalar(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Null,
        other => serde_json::from_value(other).unwrap_or_default(),
    }
}
