//! Reusable field filters
//!
//! These filters transform request field values before validation

use anyhow::Result;
use serde_json::Value;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value {
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        other => Ok(other),
    }
}

/// Filter: an empty string becomes `null`
pub fn empty_to_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value {
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        other => Ok(other),
    }
}

/// Run the input filters every string field goes through, in order
pub fn apply_input_filters(field: &str, value: Value) -> Result<Value> {
    let value = trim()(field, value)?;
    empty_to_null()(field, value)
}
