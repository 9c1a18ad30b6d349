//! Reusable field validators
//!
//! Each validator returns `Err(message)` when the value fails the check.

use serde_json::Value;

/// Validator: field is present and not empty
///
/// `null`, the empty string and numeric zero count as missing.
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.is_empty() => Err(format!("'{}' must not be empty", field)),
        Value::Number(n) if n.as_f64() == Some(0.0) => {
            Err(format!("'{}' must not be zero", field))
        }
        _ => Ok(()),
    }
}

/// Validator: field is a JSON number
///
/// Numeric strings are rejected; coercion belongs to the caller.
pub fn numeric() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_number() {
            Ok(())
        } else {
            Err(format!("'{}' must be a number", field))
        }
    }
}
