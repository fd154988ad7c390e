//! Lenient scalar accessors for untyped service JSON.

use serde_json::Value;

/// Non-empty string content of a value.
pub fn string_at(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Finite numeric content of a value; numeric strings count.
pub fn number_at(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn bool_at(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "present" | "enabled" | "1" => Some(true),
            "false" | "no" | "absent" | "disabled" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
