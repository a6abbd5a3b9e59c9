//! Reconciliation of two snapshots into a usage report.
//!
//! The later snapshot drives the comparison: every spool in it is looked up
//! by id in the baseline and the drop in remaining weight is attributed a cost
//! proportional to the baseline's price and nominal weight.
//!
//! Spools that exist only in the baseline (removed before the later capture)
//! do not appear in the report. Spools that exist only in the later snapshot
//! appear as unchanged, and only when unchanged spools are requested.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::snapshot::{Snapshot, SpoolRecord};
use crate::spool::SpoolId;

/// Change of one spool between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    /// Spool identity.
    pub id: SpoolId,
    /// Display name from the later snapshot.
    pub name: String,
    /// `baseline.remaining − later.remaining`; negative when a spool gained weight.
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_diff: Decimal,
    /// Estimated cost of the change.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_used: Decimal,
}

impl DiffRecord {
    fn unchanged(later: &SpoolRecord) -> Self {
        Self {
            id: later.id,
            name: later.name().to_string(),
            weight_diff: Decimal::ZERO,
            cost_used: Decimal::ZERO,
        }
    }

    /// Whether the spool's remaining weight did not change.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.weight_diff.is_zero()
    }
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Per-spool changes, in the later snapshot's order.
    pub records: Vec<DiffRecord>,
    /// Sum of `|weight_diff|` over changed spools, in grams.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_weight_used: Decimal,
    /// Sum of `cost_used` over changed spools.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost_used: Decimal,
}

/// A comparison whose values do not fit the decimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiffError {
    /// Weight or cost arithmetic for a spool overflowed.
    #[error("values of spool {id} are out of range, cannot compare")]
    Overflow {
        /// The spool whose values overflowed.
        id: SpoolId,
    },
}

/// Compare `baseline` with `later`.
///
/// With `include_unchanged`, spools whose weight did not change and spools
/// missing from the baseline are reported with a zero diff.
///
/// If the baseline holds the same id twice, the last record wins. Records
/// whose weights or costs overflow fail with [`DiffError::Overflow`].
///
/// # Examples
///
/// ```
/// use spoolcost_core::{diff, Snapshot, SpoolRecord};
/// use rust_decimal_macros::dec;
///
/// let baseline = Snapshot::new(vec![SpoolRecord::new(1, dec!(1000))
///     .with_price(dec!(20))
///     .with_initial_weight(dec!(1000))]);
/// let later = Snapshot::new(vec![SpoolRecord::new(1, dec!(900))]);
///
/// let report = diff(&baseline, &later, false).unwrap();
/// assert_eq!(report.records[0].weight_diff, dec!(100));
/// assert_eq!(report.total_cost_used, dec!(2));
/// ```
pub fn diff(
    baseline: &Snapshot,
    later: &Snapshot,
    include_unchanged: bool,
) -> Result<DiffReport, DiffError> {
    let by_id: HashMap<SpoolId, &SpoolRecord> =
        baseline.records().iter().map(|r| (r.id, r)).collect();

    let mut report = DiffReport::default();

    for record in later.records() {
        let Some(before) = by_id.get(&record.id) else {
            if include_unchanged {
                report.records.push(DiffRecord::unchanged(record));
            }
            continue;
        };

        let overflow = || DiffError::Overflow { id: record.id };
        let weight_diff = before
            .remaining_or_zero()
            .checked_sub(record.remaining_or_zero())
            .ok_or_else(overflow)?;
        if weight_diff.is_zero() {
            if include_unchanged {
                report.records.push(DiffRecord::unchanged(record));
            }
            continue;
        }

        let initial_weight = before.initial_weight_or_nominal();
        let cost_used = if initial_weight > Decimal::ZERO {
            weight_diff
                .abs()
                .checked_div(initial_weight)
                .and_then(|share| before.price_or_zero().checked_mul(share))
                .ok_or_else(overflow)?
        } else {
            Decimal::ZERO
        };

        report.total_weight_used = report
            .total_weight_used
            .checked_add(weight_diff.abs())
            .ok_or_else(overflow)?;
        report.total_cost_used = report
            .total_cost_used
            .checked_add(cost_used)
            .ok_or_else(overflow)?;
        report.records.push(DiffRecord {
            id: record.id,
            name: record.name().to_string(),
            weight_diff,
            cost_used,
        });
    }

    Ok(report)
}
