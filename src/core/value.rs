//! Purpose: Total, shape-checked projections over untyped response documents.
//! Exports: `object`, `array`, `string`, `number`, `render`.
//! Role: Every shape check in the decoder is one projection plus an explicit failure branch.
//! Invariants: Projections never panic; mismatches surface as `None`.
//! Invariants: `render` is deterministic (object keys are sorted by `serde_json::Map`).
use serde_json::{Map, Value};

pub fn object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

pub fn array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array()
}

pub fn string(value: &Value) -> Option<&str> {
    value.as_str()
}

pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

/// Snapshot of a raw value for error messages and log lines.
///
/// Strings are rendered bare; everything else as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
