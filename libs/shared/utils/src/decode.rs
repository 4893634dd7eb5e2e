//! Lenient decoding for Bull36 payloads.
//!
//! Upstream is inconsistent about nested values: lists such as working days,
//! doctor ids and image URLs arrive either as real JSON arrays or as strings
//! containing JSON, and ids flip between numbers and strings. These helpers
//! are meant for `#[serde(default, deserialize_with = "...")]` so that every
//! field is decoded the same way and a malformed value degrades to its default
//! instead of failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Decodes `value` as `T`, unwrapping one level of string-encoded JSON.
pub fn decode_embedded<T>(value: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    let decoded = match value {
        Value::Null => return T::default(),
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return T::default();
            }
            serde_json::from_str::<T>(raw)
        }
        other => serde_json::from_value::<T>(other.clone()),
    };

    decoded.unwrap_or_else(|e| {
        debug!("Falling back to default for undecodable value: {}", e);
        T::default()
    })
}

/// Text form of a scalar id; `None` for null, arrays and objects.
pub fn text_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A list of ids or URLs: JSON array, string-encoded JSON array, or a
/// comma-separated string.
pub fn decode_text_list(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items.clone(),
        Value::String(raw) => {
            let raw = raw.trim();
            match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => items,
                Ok(scalar @ (Value::Number(_) | Value::String(_))) => vec![scalar],
                _ => raw
                    .split(',')
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            }
        }
        Value::Number(_) => vec![value.clone()],
        _ => Vec::new(),
    };

    items.iter().filter_map(text_id).collect()
}

/// Number or numeric string.
pub fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn embedded_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_embedded(&value))
}

pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_text_list(&value))
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_id(&value))
}

pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_value(&value))
}
