//! Tolerant field extraction over `serde_json::Value`.
//!
//! The JSON-based interchange formats are parsed through `Value` rather
//! than typed structs so that field-level anomalies (a string where a
//! number was expected, a missing bbox) can be defaulted or dropped
//! per-record instead of failing the whole document.

use serde_json::Value;

/// Numeric coercion: accepts JSON numbers and numeric strings.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer coercion for ids: accepts JSON integers and whole-number strings.
pub(crate) fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// String coercion: strings pass through, numbers are stringified.
pub(crate) fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Field lookup on an object value; `None` for non-objects, absent keys
/// and explicit nulls.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// A record's id: its `id` field, then `name`, then the 1-based index.
/// Used by the generic parser, whose records often carry only a `name`.
pub(crate) fn record_id(item: &Value, index: usize) -> String {
    field(item, "id")
        .and_then(coerce_string)
        .or_else(|| field(item, "name").and_then(coerce_string))
        .unwrap_or_else(|| (index + 1).to_string())
}

/// A COCO-family annotation id: the `id` field or the 1-based index.
/// No `name` fallback; COCO `name` fields are not unique per annotation.
pub(crate) fn annotation_id(item: &Value, index: usize) -> String {
    field(item, "id")
        .and_then(coerce_string)
        .unwrap_or_else(|| (index + 1).to_string())
}

/// A COCO-style `bbox` array decoded as `[x, y, w, h]`, defaulting absent
/// or malformed entries to 0.
pub(crate) fn bbox_xywh(item: &Value) -> [f64; 4] {
    let mut out = [0.0; 4];
    if let Some(Value::Array(entries)) = field(item, "bbox") {
        for (slot, entry) in out.iter_mut().zip(entries.iter()) {
            *slot = coerce_f64(entry).unwrap_or(0.0);
        }
    }
    out
}
