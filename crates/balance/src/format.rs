//! Display formatting for record values.

use crate::metrics::round_to;
use crate::record::Kind;

/// The placeholder shown for a value with no data.
pub const NO_DATA: &str = "—";

/// Formats `value` for display according to its kind.
pub fn display(value: Option<f64>, kind: Kind) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return String::from(NO_DATA);
    };

    match kind {
        Kind::Quantity => grouped(value, 1),
        Kind::Percentage => format!("{}%", grouped(value, 1)),
        Kind::Score => format!("{:.1}", normalize_zero(round_to(value, 1))),
        Kind::Index => format!("{:.3}", normalize_zero(round_to(value, 3))),
    }
}

/// Formats `value` with `decimals` decimals and comma thousands separators.
pub fn grouped(value: f64, decimals: usize) -> String {
    let rounded = normalize_zero(round_to(value, decimals as i32));
    let text = format!("{:.*}", decimals, rounded.abs());
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut output = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded < 0.0 {
        output.push('-');
    }

    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(digit);
    }

    if let Some(fraction) = fraction {
        output.push('.');
        output.push_str(fraction);
    }

    output
}

// Avoids rendering "-0.0" for tiny negative values.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
