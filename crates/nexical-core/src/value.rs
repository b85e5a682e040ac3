//! Helpers for interpreting loosely-typed JSON values.
//!
//! API payloads and filter objects arrive as [`serde_json::Value`]s. The SDK
//! needs two consistent answers about them across crates: whether a value
//! counts as "present", and how a value is written into a query string.

use serde_json::Value;

/// Returns `true` when the value counts as present.
///
/// `null`, `false`, numeric zero and the empty string are absent. Every
/// array and object is present, including empty ones.
///
/// # Examples
///
/// ```rust
/// use nexical_core::value::is_truthy;
/// use serde_json::json;
///
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// assert!(is_truthy(&json!({})));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value the way it appears in a query string.
///
/// Strings are written without quotes, integral numbers without a trailing
/// `.0`, magnitudes of at least `1e21` or below `1e-6` in exponent form
/// (`1e+21`, `1e-7`), and arrays as their elements joined by `,` (a `null` element becomes
/// an empty segment). Objects nested inside arrays are written as compact JSON.
pub fn to_query_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_query_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if f == 0.0 {
        "0".to_string()
    } else if magnitude >= 1e21 || magnitude < 1e-6 {
        exponent_form(f)
    } else {
        f.to_string()
    }
}

/// `1e21` becomes `1e+21`; negative exponents keep their sign.
fn exponent_form(f: f64) -> String {
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
