//! Number rendering for the calculator display.

use super::state::{parse_numeral, CalculatorState};

/// Displays longer than this switch to exponential notation.
pub const DISPLAY_WIDTH: usize = 12;

/// Fractional digits used in exponential notation.
pub const EXPONENT_DIGITS: usize = 6;

/// Canonical, locale-independent rendering of a result.
///
/// Never emits an exponent, so the output always reads back as a numeral.
/// Negative zero and non-finite values render as `"0"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// `1234567890123.0` with 6 digits becomes `1.234568e+12`.
pub fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let raw = format!("{:.*e}", fraction_digits, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => raw,
    }
}

/// What the screen shows for a raw display string.
pub fn present_display(display: &str) -> String {
    if display.chars().count() > DISPLAY_WIDTH {
        to_exponential(parse_numeral(display), EXPONENT_DIGITS)
    } else {
        display.to_string()
    }
}

/// Secondary line, e.g. `"12 ×"`, shown while an operation is pending.
pub fn pending_line(state: &CalculatorState) -> Option<String> {
    let value = state.pending_value()?;
    let op = state.pending_operator()?;
    Some(format!("{} {}", format_number(value), op.symbol()))
}
