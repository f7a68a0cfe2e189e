// src/utils/json.rs

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::error::AppError;

/// Parses a raw request body into a request DTO.
///
/// The body must be a JSON object with at least one key; anything else
/// (bad UTF-8, bad JSON, arrays, scalars, `{}`) is rejected as "Invalid JSON".
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(body)?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(AppError::BadRequest("Invalid JSON".to_string())),
    }

    Ok(serde_json::from_value(value)?)
}

/// Field deserializer: only a non-empty string counts as present.
///
/// Use with `#[serde(default, deserialize_with = "non_empty_string")]`.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}
