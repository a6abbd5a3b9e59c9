//! Point-in-time captures of the inventory.
//!
//! A [`Snapshot`] keeps only what a later usage audit needs: identity,
//! economics and remaining weight of each spool, plus a few filament fields for
//! display. Filament geometry is not kept.
//!
//! Record fields mirror the JSON written to disk and may be `null`. The
//! accessors on [`SpoolRecord`] are the single place where missing values are
//! resolved:
//!
//! | Field              | Missing   |
//! |--------------------|-----------|
//! | `price`            | 0         |
//! | `initial_weight`   | 1000 g    |
//! | `remaining_weight` | 0 g       |
//! | `filament.name`    | "Unknown" |

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::spool::{Spool, SpoolId, UNKNOWN_NAME};

/// Nominal spool weight assumed when a record has none (1 kg).
pub const NOMINAL_SPOOL_WEIGHT: Decimal = Decimal::ONE_THOUSAND;

/// Filament fields kept in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilament {
    /// Filament name.
    #[serde(default)]
    pub name: Option<String>,
    /// Filament material.
    #[serde(default)]
    pub material: Option<String>,
    /// Filament colour.
    #[serde(default)]
    pub color_hex: Option<String>,
}

/// One spool as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoolRecord {
    /// Spool identity.
    pub id: SpoolId,
    /// Price paid.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Nominal weight in grams.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub initial_weight: Option<Decimal>,
    /// Remaining weight in grams at capture time.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub remaining_weight: Option<Decimal>,
    /// Display fields.
    #[serde(default)]
    pub filament: RecordFilament,
}

impl SpoolRecord {
    /// Create a record with the given remaining weight and no other data.
    #[must_use]
    pub fn new(id: u64, remaining_weight: Decimal) -> Self {
        Self {
            id: SpoolId(id),
            price: None,
            initial_weight: None,
            remaining_weight: Some(remaining_weight),
            filament: RecordFilament::default(),
        }
    }

    /// Set the price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the nominal weight.
    #[must_use]
    pub fn with_initial_weight(mut self, initial_weight: Decimal) -> Self {
        self.initial_weight = Some(initial_weight);
        self
    }

    /// Set the filament name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.filament.name = Some(name.into());
        self
    }

    /// Capture a catalog spool.
    #[must_use]
    pub fn from_spool(spool: &Spool) -> Self {
        Self {
            id: spool.id,
            price: Some(spool.price),
            initial_weight: Some(spool.initial_weight),
            remaining_weight: Some(spool.remaining_weight),
            filament: RecordFilament {
                name: Some(spool.filament.name.clone()),
                material: spool.filament.material.clone(),
                color_hex: spool.filament.color_hex.clone(),
            },
        }
    }

    /// Price, or zero.
    #[must_use]
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or_default()
    }

    /// Nominal weight, or [`NOMINAL_SPOOL_WEIGHT`].
    #[must_use]
    pub fn initial_weight_or_nominal(&self) -> Decimal {
        self.initial_weight.unwrap_or(NOMINAL_SPOOL_WEIGHT)
    }

    /// Remaining weight, or zero.
    #[must_use]
    pub fn remaining_or_zero(&self) -> Decimal {
        self.remaining_weight.unwrap_or_default()
    }

    /// Display name, or "Unknown".
    #[must_use]
    pub fn name(&self) -> &str {
        self.filament.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

/// An immutable capture of the inventory.
///
/// Records keep the order they were captured in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<SpoolRecord>,
    captured_at: Option<NaiveDateTime>,
}

impl Snapshot {
    /// Create a snapshot from records.
    #[must_use]
    pub fn new(records: Vec<SpoolRecord>) -> Self {
        Self {
            records,
            captured_at: None,
        }
    }

    /// Capture every spool of a catalog, in catalog order.
    #[must_use]
    pub fn from_catalog(spools: &[Spool]) -> Self {
        Self::new(spools.iter().map(SpoolRecord::from_spool).collect())
    }

    /// Attach the capture time.
    #[must_use]
    pub fn with_captured_at(mut self, captured_at: NaiveDateTime) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    /// The captured records.
    #[must_use]
    pub fn records(&self) -> &[SpoolRecord] {
        &self.records
    }

    /// When the snapshot was taken, if known.
    #[must_use]
    pub const fn captured_at(&self) -> Option<NaiveDateTime> {
        self.captured_at
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<SpoolRecord>> for Snapshot {
    fn from(records: Vec<SpoolRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spool::Filament;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_defaults() {
        let record: SpoolRecord = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(record.price_or_zero(), dec!(0));
        assert_eq!(record.initial_weight_or_nominal(), dec!(1000));
        assert_eq!(record.remaining_or_zero(), dec!(0));
        assert_eq!(record.name(), "Unknown");
    }

    #[test]
    fn test_record_json_numbers() {
        let json = r#"{
            "id": 1,
            "price": 16.49,
            "initial_weight": 1000,
            "remaining_weight": 912.13,
            "filament": {"name": "PLA Red", "material": "PLA", "color_hex": "ff0000"}
        }"#;
        let record: SpoolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, SpoolId(1));
        assert_eq!(record.price, Some(dec!(16.49)));
        assert_eq!(record.initial_weight, Some(dec!(1000)));
        assert_eq!(record.remaining_weight, Some(dec!(912.13)));
        assert_eq!(record.filament.color_hex.as_deref(), Some("ff0000"));
    }

    #[test]
    fn test_record_writes_numbers_and_nulls() {
        let record = SpoolRecord::new(2, dec!(440)).with_price(dec!(10.99));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["price"], serde_json::json!(10.99));
        assert_eq!(value["remaining_weight"], serde_json::json!(440.0));
        assert!(value["initial_weight"].is_null());
    }

    #[test]
    fn test_from_catalog_keeps_order_and_fields() {
        let catalog = vec![
            Spool::new(9, dec!(20), dec!(1000), dec!(100)).with_filament(
                Filament::new("Silk Gold")
                    .with_material("PLA")
                    .with_color("d4af37"),
            ),
            Spool::new(3, dec!(25), dec!(750), dec!(750)),
        ];
        let snapshot = Snapshot::from_catalog(&catalog);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.records()[0].id, SpoolId(9));
        assert_eq!(snapshot.records()[0].name(), "Silk Gold");
        assert_eq!(snapshot.records()[1].initial_weight, Some(dec!(750)));
        assert!(snapshot.captured_at().is_none());
    }
}
