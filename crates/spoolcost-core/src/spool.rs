//! Spool and filament types.
//!
//! A [`Spool`] is one physical roll of filament tracked in the inventory. Its
//! numeric fields are fully resolved: the default-resolution rules for
//! missing catalog data are applied once, when the spool is constructed, and
//! never again at the call sites that read it.
//!
//! # Default resolution
//!
//! | Field      | Missing      | Non-positive |
//! |------------|--------------|--------------|
//! | `diameter` | 1.75 mm      | 1.75 mm      |
//! | `density`  | 1.24 g/cm³   | kept as-is   |
//!
//! A non-positive density is kept so that the accounting session can report
//! it as an invalid configuration when a length has to be converted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Filament diameter assumed when the catalog has none (1.75 mm).
pub const DEFAULT_DIAMETER_MM: Decimal = Decimal::from_parts(175, 0, 0, false, 2);

/// Filament density assumed when the catalog has none (1.24 g/cm³, PLA).
pub const DEFAULT_DENSITY_G_CM3: Decimal = Decimal::from_parts(124, 0, 0, false, 2);

/// Name shown for spools whose filament has no name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Unique identity of a spool in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpoolId(pub u64);

impl fmt::Display for SpoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for SpoolId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Filament attributes of a spool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filament {
    /// Display name of the filament.
    pub name: String,
    /// Material (free text, e.g. "PLA").
    pub material: Option<String>,
    /// Diameter in millimetres, always positive.
    pub diameter_mm: Decimal,
    /// Density in g/cm³.
    pub density_g_cm3: Decimal,
    /// Colour as a hex string, without the leading `#`.
    pub color_hex: Option<String>,
}

impl Filament {
    /// Create a filament with the given name and default geometry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            diameter_mm: DEFAULT_DIAMETER_MM,
            density_g_cm3: DEFAULT_DENSITY_G_CM3,
            color_hex: None,
        }
    }

    /// Set the material.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set the diameter. Non-positive values fall back to [`DEFAULT_DIAMETER_MM`].
    #[must_use]
    pub fn with_diameter(mut self, diameter_mm: Decimal) -> Self {
        self.diameter_mm = resolve_diameter(Some(diameter_mm));
        self
    }

    /// Set the density.
    #[must_use]
    pub fn with_density(mut self, density_g_cm3: Decimal) -> Self {
        self.density_g_cm3 = density_g_cm3;
        self
    }

    /// Set the colour.
    #[must_use]
    pub fn with_color(mut self, color_hex: impl Into<String>) -> Self {
        self.color_hex = Some(color_hex.into());
        self
    }
}

/// Resolve an optional catalog diameter to a usable one.
#[must_use]
pub fn resolve_diameter(diameter_mm: Option<Decimal>) -> Decimal {
    match diameter_mm {
        Some(d) if d > Decimal::ZERO => d,
        _ => DEFAULT_DIAMETER_MM,
    }
}

/// Resolve an optional catalog density. Only a missing value is defaulted.
#[must_use]
pub fn resolve_density(density_g_cm3: Option<Decimal>) -> Decimal {
    density_g_cm3.unwrap_or(DEFAULT_DENSITY_G_CM3)
}

/// A spool of filament.
///
/// # Examples
///
/// ```
/// use spoolcost_core::{Filament, Spool};
/// use rust_decimal_macros::dec;
///
/// let spool = Spool::new(1, dec!(20), dec!(1000), dec!(900))
///     .with_filament(Filament::new("PLA Red").with_material("PLA"));
///
/// assert!(spool.validate().is_ok());
/// assert_eq!(spool.name(), "PLA Red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spool {
    /// Spool identity.
    pub id: SpoolId,
    /// Price paid for the spool.
    pub price: Decimal,
    /// Nominal filament mass when new, in grams.
    pub initial_weight: Decimal,
    /// Filament mass left, in grams.
    pub remaining_weight: Decimal,
    /// Filament attributes.
    pub filament: Filament,
}

impl Spool {
    /// Create a spool with an unnamed default filament.
    #[must_use]
    pub fn new(id: u64, price: Decimal, initial_weight: Decimal, remaining_weight: Decimal) -> Self {
        Self {
            id: SpoolId(id),
            price,
            initial_weight,
            remaining_weight,
            filament: Filament::new(UNKNOWN_NAME),
        }
    }

    /// Attach filament attributes.
    #[must_use]
    pub fn with_filament(mut self, filament: Filament) -> Self {
        self.filament = filament;
        self
    }

    /// Display name of the spool's filament.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.filament.name
    }

    /// Check the inventory invariants of this spool.
    ///
    /// Prices and weights must not be negative. When the initial weight is
    /// known (positive) the remaining weight may not exceed it.
    pub fn validate(&self) -> Result<(), SpoolError> {
        for (field, value) in [
            ("price", self.price),
            ("initial_weight", self.initial_weight),
            ("remaining_weight", self.remaining_weight),
        ] {
            if value < Decimal::ZERO {
                return Err(SpoolError::Negative {
                    id: self.id,
                    field,
                    value,
                });
            }
        }
        if self.initial_weight > Decimal::ZERO && self.remaining_weight > self.initial_weight {
            return Err(SpoolError::RemainingExceedsInitial {
                id: self.id,
                remaining: self.remaining_weight,
                initial: self.initial_weight,
            });
        }
        Ok(())
    }
}

/// A spool that breaks the inventory invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpoolError {
    /// A price or weight is negative.
    #[error("spool {id}: {field} is negative ({value})")]
    Negative {
        /// The offending spool.
        id: SpoolId,
        /// Name of the negative field.
        field: &'static str,
        /// The value found.
        value: Decimal,
    },
    /// More filament left than the spool held when new.
    #[error("spool {id}: remaining weight {remaining} g exceeds initial weight {initial} g")]
    RemainingExceedsInitial {
        /// The offending spool.
        id: SpoolId,
        /// Remaining weight in grams.
        remaining: Decimal,
        /// Initial weight in grams.
        initial: Decimal,
    },
}
