//! Strict helpers for extracting typed parameters from a `serde_json::Value` object.
//!
//! The engine supplies no defaults: a missing key is a
//! [`RdkError::ParamNotFound`], and a key of the wrong JSON type is a
//! [`RdkError::ParamTypeMismatch`]. Defaults belong to whoever builds the
//! configuration.

use crate::error::RdkError;
use serde_json::Value;

/// Name of the JSON type of `value`, used in mismatch errors.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> RdkError {
    RdkError::ParamTypeMismatch {
        name: name.to_owned(),
        expected: expected.to_owned(),
        got: json_type_name(got).to_owned(),
    }
}

/// Extracts a required `f64` from `params[name]`.
///
/// Accepts any JSON number, integers included.
pub fn require_f64(params: &Value, name: &str) -> Result<f64, RdkError> {
    let value = params
        .get(name)
        .ok_or_else(|| RdkError::ParamNotFound(name.to_owned()))?;
    value.as_f64().ok_or_else(|| mismatch(name, "number", value))
}

/// Extracts a required non-negative integer from `params[name]`.
///
/// Floats such as `2.5` and negative integers are type mismatches.
pub fn require_u64(params: &Value, name: &str) -> Result<u64, RdkError> {
    let value = params
        .get(name)
        .ok_or_else(|| RdkError::ParamNotFound(name.to_owned()))?;
    value
        .as_u64()
        .ok_or_else(|| mismatch(name, "unsigned integer", value))
}

/// Extracts an optional `f64`. Absent keys and explicit `null` yield `None`.
pub fn optional_f64(params: &Value, name: &str) -> Result<Option<f64>, RdkError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| mismatch(name, "number", value)),
    }
}
