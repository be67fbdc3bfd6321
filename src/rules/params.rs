//! Lenient parameter accessors.
//!
//! Parameters come from externally edited records, so numbers may arrive as
//! JSON numbers or numeric strings. Anything else yields the default.

use serde_json::Value;

use crate::models::RuleParams;

/// Reads a non-negative integer parameter.
pub fn param_u32(params: &RuleParams, key: &str, default: u32) -> u32 {
    let parsed = match params.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.unwrap_or(default)
}

/// Reads a finite, non-negative numeric parameter.
pub fn param_f64(params: &RuleParams, key: &str, default: f64) -> f64 {
    let parsed = match params.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

/// Reads a non-empty string parameter.
pub fn param_str<'a>(params: &'a RuleParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
