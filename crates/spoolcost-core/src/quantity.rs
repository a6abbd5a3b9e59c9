//! Parsing of free-form usage strings such as `100g`, `1.34m` or `200`.
//!
//! Accepted grammar, after trimming surrounding whitespace:
//!
//! ```text
//! quantity := number unit?
//! number   := digit* ("." digit*)?     (at least one digit)
//! unit     := "g" | "G" | "m" | "M"
//! ```
//!
//! A missing unit means grams.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::units::{Quantity, Unit};

/// Error parsing a usage string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The input is not a number optionally followed by `g` or `m`.
    #[error(
        "invalid input format {input:?}: enter a number followed by 'g' or 'm', or just a number"
    )]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },
    /// The quantity is well formed but its mass is too large to represent.
    #[error("quantity {input:?} is too large")]
    OutOfRange {
        /// The rejected input.
        input: String,
    },
}

impl QuantityError {
    fn invalid(input: &str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
        }
    }
}

/// Parse a usage string into a [`Quantity`].
///
/// # Examples
///
/// ```
/// use spoolcost_core::{parse_quantity, Unit};
/// use rust_decimal_macros::dec;
///
/// let q = parse_quantity(" 5.5M ").unwrap();
/// assert_eq!(q.value, dec!(5.5));
/// assert_eq!(q.unit, Unit::Meters);
///
/// assert!(parse_quantity("100kg").is_err());
/// ```
pub fn parse_quantity(text: &str) -> Result<Quantity, QuantityError> {
    let trimmed = text.trim();

    let (number, unit) = match trimmed.char_indices().next_back() {
        None => return Err(QuantityError::invalid(text)),
        Some((idx, c)) if c.is_ascii_alphabetic() => {
            let unit = Unit::from_suffix(c).ok_or_else(|| QuantityError::invalid(text))?;
            (&trimmed[..idx], unit)
        }
        Some(_) => (trimmed, Unit::Grams),
    };

    let value = parse_number(number).ok_or_else(|| QuantityError::invalid(text))?;
    Ok(Quantity::new(value, unit))
}

/// Parse unsigned digits with at most one decimal point.
fn parse_number(s: &str) -> Option<Decimal> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = match frac_part {
        Some(f) if !f.is_empty() => format!("{int_part}.{f}"),
        _ => int_part.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s)
    }
}
