//! Numeric coercion for loosely typed sensor payloads
//!
//! Devices send values either as JSON numbers or as numeric strings.
//! Anything else, and any non-finite result, is rejected.

use serde_json::Value;

/// Interpret a JSON value as a finite `f64`
pub fn coerce_finite(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        },
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Round half away from zero to `decimals` places
///
/// Values too large to scale are returned unchanged; they carry no
/// fractional digits at that magnitude anyway.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
