//! Scalar rendering for card widgets.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::numeric::finite_number;

/// Rendered for absent, null, NaN and otherwise unformattable values.
pub const PLACEHOLDER: &str = "—";

/// How a card field is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    #[default]
    Number,
    Currency,
    Percent,
}

/// Render `value` according to `kind`. Never fails.
///
/// - `Number` keeps the raw text of the value (no precision change); strings
///   are shown as-is.
/// - `Currency` renders `$1,234.50`; non-numeric input gives [`PLACEHOLDER`].
/// - `Percent` appends `%` to the raw number; non-numeric input gives
///   [`PLACEHOLDER`].
pub fn format_value(value: Option<&Value>, kind: FieldFormat) -> String {
    let value = match value {
        None | Some(Value::Null) => return PLACEHOLDER.to_string(),
        Some(v) => v,
    };

    if let Value::String(s) = value {
        // "NaN" / "Infinity" strings are treated like a NaN number.
        if let Ok(n) = s.trim().parse::<f64>() {
            if !n.is_finite() {
                return PLACEHOLDER.to_string();
            }
        }
    }

    match kind {
        FieldFormat::Number => plain_text(value),
        FieldFormat::Currency => match finite_number(value) {
            Some(n) => format_currency(n),
            None => PLACEHOLDER.to_string(),
        },
        FieldFormat::Percent => match finite_number(value) {
            Some(_) => format!("{}%", plain_text(value)),
            None => PLACEHOLDER.to_string(),
        },
    }
}

/// Render a bare number, e.g. a derived analytic.
pub fn format_number(value: Option<f64>, kind: FieldFormat) -> String {
    let json = value
        .filter(|n| n.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number);
    format_value(json.as_ref(), kind)
}

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64(),
        None => Some((value * 100.0).round() / 100.0),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn format_currency(n: f64) -> String {
    let fixed = match Decimal::from_f64(n.abs()) {
        Some(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", n.abs()),
    };

    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.chars().all(|c| c == '0');
    let sign = if n < 0.0 && !is_zero { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
