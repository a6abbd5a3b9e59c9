//! Conversion between filament length and mass.
//!
//! Filament is a cylinder, so its linear density follows from the diameter and
//! the material density:
//!
//! ```text
//! area (cm²)   = π · (diameter_mm / 20)²
//! g/cm         = area · density
//! g/m          = g/cm · 100
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::spool::DEFAULT_DIAMETER_MM;

/// Unit of an entered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Mass in grams.
    #[default]
    #[serde(rename = "g")]
    Grams,
    /// Length in metres.
    #[serde(rename = "m")]
    Meters,
}

impl Unit {
    /// Map a unit suffix (`g` or `m`, any case) to a unit.
    #[must_use]
    pub const fn from_suffix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' => Some(Self::Grams),
            'm' => Some(Self::Meters),
            _ => None,
        }
    }

    /// Short symbol used in reports.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Meters => "m",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value with a unit, as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// The numeric value (never negative when produced by the parser).
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// The unit of `value`.
    pub unit: Unit,
}

impl Quantity {
    /// Create a new quantity.
    #[must_use]
    pub const fn new(value: Decimal, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A quantity in grams.
    #[must_use]
    pub const fn grams(value: Decimal) -> Self {
        Self::new(value, Unit::Grams)
    }

    /// A quantity in metres.
    #[must_use]
    pub const fn meters(value: Decimal) -> Self {
        Self::new(value, Unit::Meters)
    }

    /// Resolve to grams, using `grams_per_meter` for lengths.
    ///
    /// Returns `None` if the mass does not fit in a [`Decimal`].
    #[must_use]
    pub fn to_grams(&self, grams_per_meter: Decimal) -> Option<Decimal> {
        match self.unit {
            Unit::Grams => Some(self.value),
            Unit::Meters => self.value.checked_mul(grams_per_meter),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Mass per metre of filament, in grams.
///
/// A non-positive diameter is replaced by [`DEFAULT_DIAMETER_MM`]. The density
/// is not checked: a non-positive density yields a non-positive result, which
/// callers treat as an invalid configuration. Results beyond the [`Decimal`]
/// range saturate at [`Decimal::MAX`] or [`Decimal::MIN`].
///
/// # Examples
///
/// ```
/// use spoolcost_core::mass_per_length;
/// use rust_decimal_macros::dec;
///
/// let gpm = mass_per_length(dec!(1.75), dec!(1.24));
/// assert!((gpm - dec!(2.9825)).abs() < dec!(0.0001));
/// ```
#[must_use]
pub fn mass_per_length(diameter_mm: Decimal, density_g_cm3: Decimal) -> Decimal {
    let diameter_mm = if diameter_mm <= Decimal::ZERO {
        DEFAULT_DIAMETER_MM
    } else {
        diameter_mm
    };
    let radius_cm = diameter_mm / Decimal::from(20);
    radius_cm
        .checked_mul(radius_cm)
        .and_then(|r2| r2.checked_mul(Decimal::PI))
        .and_then(|area_cm2| area_cm2.checked_mul(density_g_cm3))
        .and_then(|g_per_cm| g_per_cm.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if density_g_cm3 < Decimal::ZERO {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}
