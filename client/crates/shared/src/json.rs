//! JSON payload sanitizing
//!
//! Payloads assembled from form or query state tend to carry placeholder
//! values (`""`, `null`, `{}`, `[]`). The API treats a present-but-empty
//! field differently from an absent one, so these helpers strip every empty
//! member before a payload leaves the client.
//!
//! Emptiness is structural, not falsiness: `0`, `false` and `"0"` are kept.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::app_error::AppResult;

/// Deep-clean a JSON value
///
/// At every level removes `""`, `null`, `{}` and `[]`. Containers are
/// cleaned recursively and dropped when nothing is left in them. String
/// members that look like serialized JSON are parsed and cleaned in place;
/// when they do not parse they are kept verbatim, and when they parse to a
/// scalar (`"\"[x]\""`) they are dropped.
///
/// Array elements follow the same rule, so arrays are compacted while the
/// order of the surviving elements is preserved.
///
/// A scalar at the top level (including `null`) yields an empty object.
///
/// ## Examples
/// ```rust
/// use kernel::json::remove_empty_in_obj;
/// use serde_json::json;
///
/// let cleaned = remove_empty_in_obj(&json!({"a": 1, "b": "", "c": {}, "d": [1, 2], "e": []}));
/// assert_eq!(cleaned, json!({"a": 1, "d": [1, 2]}));
/// ```
pub fn remove_empty_in_obj(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(clean_map(map)),
        Value::Array(items) => Value::Array(clean_seq(items)),
        _ => Value::Object(Map::new()),
    }
}

/// Parse a JSON document and deep-clean it
///
/// Malformed input is reported as a `BadRequest` error.
pub fn remove_empty_in_str(input: &str) -> AppResult<Value> {
    let value: Value = serde_json::from_str(input)?;
    Ok(remove_empty_in_obj(&value))
}

/// Serialize any value to JSON and deep-clean it
pub fn remove_empty_in<T>(value: &T) -> AppResult<Value>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    Ok(remove_empty_in_obj(&value))
}

/// True for the values the sanitizer removes
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn clean_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter_map(|(key, value)| clean_member(value).map(|v| (key.clone(), v)))
        .collect()
}

fn clean_seq(items: &[Value]) -> Vec<Value> {
    items.iter().filter_map(clean_member).collect()
}

fn clean_member(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Object(_) | Value::Array(_) => non_empty(remove_empty_in_obj(value)),
        Value::String(s) if looks_like_json(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                non_empty(remove_empty_in_obj(&parsed))
            }
            Ok(_) => None,
            Err(_) => Some(value.clone()),
        },
        other => Some(other.clone()),
    }
}

fn non_empty(value: Value) -> Option<Value> {
    if is_empty_value(&value) {
        None
    } else {
        Some(value)
    }
}

fn looks_like_json(s: &str) -> bool {
    (s.contains('{') && s.contains('}')) || (s.contains('[') && s.contains(']'))
}
