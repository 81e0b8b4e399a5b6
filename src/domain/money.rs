use std::fmt;

use serde::Serializer;
use serde::ser::SerializeSeq;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents for display with a currency symbol.
/// Example: 5000 -> "$50.00", -1234 -> "-$12.34"
pub fn format_dollars(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Cents as a decimal number of units, for presentation.
/// Example: 100000 -> 1000.0, 1250 -> 12.5
pub fn cents_to_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// `serialize_with` helper: write cents as decimal units.
pub fn serialize_units<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(cents_to_units(*cents))
}

/// `serialize_with` helper: write a series of cents as decimal units.
pub fn serialize_units_seq<S: Serializer>(
    values: &[Cents],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for cents in values {
        seq.serialize_element(&cents_to_units(*cents))?;
    }
    seq.end()
}

/// Parse a user-entered amount into cents.
///
/// Accepts an optional leading `+`, whole units and up to two decimal places
/// ("50", "50.5", "50.05", ".5"). Negative values, extra precision and any
/// other characters are rejected.
pub fn parse_amount(input: &str) -> Result<Cents, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if input.starts_with('-') {
        return Err(AmountError::Negative);
    }
    let input = input.strip_prefix('+').unwrap_or(input);

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(AmountError::InvalidFormat);
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(decimal_str) {
        return Err(AmountError::InvalidFormat);
    }
    if decimal_str.len() > 2 {
        return Err(AmountError::TooPrecise);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| AmountError::OutOfRange)?
    };

    // "5" after the point means 50 cents
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => i64::from(decimal_str.as_bytes()[0] - b'0') * 10,
        _ => decimal_str.parse().map_err(|_| AmountError::InvalidFormat)?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(AmountError::OutOfRange)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    InvalidFormat,
    Negative,
    TooPrecise,
    OutOfRange,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "amount is empty"),
            AmountError::InvalidFormat => write!(f, "invalid money format"),
            AmountError::Negative => write!(f, "amount must not be negative"),
            AmountError::TooPrecise => write!(f, "amount has more than two decimal places"),
            AmountError::OutOfRange => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for AmountError {}
