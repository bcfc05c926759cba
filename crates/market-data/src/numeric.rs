//! Lenient numeric coercion for provider payloads.
//!
//! Providers mix number- and string-typed numerics (`"187.2500"` vs
//! `187.25`). Both are accepted; anything that does not yield a finite
//! `f64` is treated as absent.

use serde_json::Value;

/// Coerce a JSON value to a finite `f64`.
pub fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Same as [`finite_number`] for an optional value.
pub(crate) fn finite_opt(value: Option<&Value>) -> Option<f64> {
    value.and_then(finite_number)
}

/// Look up an OHLCV field on a provider row by case-insensitive substring.
///
/// Matches `"1. open"`, `"1a. open (USD)"` and `"open"` alike for
/// `name == "open"`. Keys are scanned in map order and the first hit wins.
pub(crate) fn field_containing<'a>(row: &'a Value, name: &str) -> Option<&'a Value> {
    let map = row.as_object()?;
    map.iter()
        .find(|(key, _)| key.to_ascii_lowercase().contains(name))
        .map(|(_, value)| value)
}

/// Coerce a JSON value to whole unix seconds.
pub(crate) fn unix_seconds(value: &Value) -> Option<i64> {
    let n = finite_number(value)?;
    if n < i64::MIN as f64 || n > i64::MAX as f64 {
        return None;
    }
    Some(n.trunc() as i64)
}
