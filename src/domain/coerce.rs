//! Missing-or-mistyped field policy for casparser output.
//!
//! Every scalar read from the raw document goes through [`text`] or [`number`],
//! so the defaulting rules live in exactly one place.

use serde_json::Value;

/// 字串欄位：缺少或型別不符時回傳空字串
pub fn text(value: &Value) -> String {
    text_or(value, "")
}

/// Like [`text`] but with a caller-chosen fallback for empty values.
pub fn text_or(value: &Value, fallback: &str) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    };

    if rendered.is_empty() {
        fallback.to_string()
    } else {
        rendered
    }
}

/// 數值欄位：字串會嘗試解析，其餘一律為 0
pub fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or_else(|_| {
            if !s.trim().is_empty() {
                tracing::debug!("Non-numeric value {:?} coerced to 0", s);
            }
            0.0
        }),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// A value counts as present when it is not one of JSON's "empty" forms.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) | Value::Bool(true) => true,
    }
}
