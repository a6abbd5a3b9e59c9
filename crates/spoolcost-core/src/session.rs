//! Interactive usage accounting against a spool catalog.
//!
//! An [`InventorySession`] walks through the states
//!
//! ```text
//! Idle ──select──▶ SpoolSelected ──account──▶ Accounted ──▶ Idle ... ──finish──▶ Finished
//! ```
//!
//! Bad input never aborts a session. Invalid selections, malformed
//! quantities and usage beyond the remaining inventory are reported as
//! [`AccountingError`]s and leave the session where the caller can try
//! again.
//!
//! Usage recorded during a session counts against the spool for the rest of
//! the session: two prints of 600 g cannot both be booked against a spool
//! with 900 g left.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::cost::CostError;
use crate::quantity::{parse_quantity, QuantityError};
use crate::spool::{Spool, SpoolId};
use crate::units::{mass_per_length, Quantity, Unit};

/// Where a session is in the accounting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a spool to be selected.
    Idle,
    /// A spool is selected and a quantity is expected.
    SpoolSelected {
        /// Zero-based position of the spool in the catalog.
        index: usize,
    },
    /// The last quantity was booked; the next selection may follow.
    Accounted,
    /// The session is closed and its summary was taken.
    Finished,
}

/// One booked usage of a spool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    /// The spool the filament came from.
    pub spool_id: SpoolId,
    /// Display name of the spool.
    pub spool_name: String,
    /// The quantity as entered.
    pub quantity: Quantity,
    /// Mass consumed in grams.
    #[serde(with = "rust_decimal::serde::float")]
    pub grams: Decimal,
    /// Cost of the consumed mass.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
}

/// The final output of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Booked entries in selection order.
    pub entries: Vec<UsageEntry>,
    /// Exact sum of the entry costs.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
}

/// A recoverable accounting failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountingError {
    /// The choice does not name a catalog entry.
    #[error("invalid selection {choice:?}: choose a number between 1 and {count}")]
    InvalidSelection {
        /// What the user entered.
        choice: String,
        /// Number of spools in the catalog.
        count: usize,
    },
    /// The quantity could not be parsed.
    #[error(transparent)]
    InvalidFormat(#[from] QuantityError),
    /// More filament than the spool has left.
    #[error("filament used ({requested:.2} g) exceeds remaining spool weight ({available:.2} g)")]
    InventoryExceeded {
        /// Requested mass in grams.
        requested: Decimal,
        /// Mass still available in grams.
        available: Decimal,
    },
    /// The spool's filament data cannot convert a length to a mass.
    #[error("spool {id} has a non-positive density ({density} g/cm³), cannot convert metres")]
    InvalidConfiguration {
        /// The offending spool.
        id: SpoolId,
        /// Its density.
        density: Decimal,
    },
    /// The cost model rejected the spool.
    #[error("cannot price spool {id}: {source}")]
    Cost {
        /// The offending spool.
        id: SpoolId,
        /// The underlying cost error.
        #[source]
        source: CostError,
    },
    /// A quantity was entered before a spool was selected.
    #[error("no spool selected")]
    NoSpoolSelected,
    /// The session was already finished.
    #[error("session already finished")]
    SessionFinished,
}

/// An accounting pass over a catalog.
///
/// # Examples
///
/// ```
/// use spoolcost_core::{InventorySession, Spool};
/// use rust_decimal_macros::dec;
///
/// let catalog = vec![Spool::new(7, dec!(30), dec!(1000), dec!(800))];
/// let mut session = InventorySession::new(&catalog);
///
/// session.select("1").unwrap();
/// let entry = session.account("50g").unwrap();
/// assert_eq!(entry.cost, dec!(1.5));
///
/// let summary = session.finish().unwrap();
/// assert_eq!(summary.total_cost, dec!(1.5));
/// ```
#[derive(Debug)]
pub struct InventorySession<'a> {
    catalog: &'a [Spool],
    state: SessionState,
    entries: Vec<UsageEntry>,
    total_cost: Decimal,
    consumed: HashMap<SpoolId, Decimal>,
}

impl<'a> InventorySession<'a> {
    /// Start a session over `catalog`.
    #[must_use]
    pub fn new(catalog: &'a [Spool]) -> Self {
        Self {
            catalog,
            state: SessionState::Idle,
            entries: Vec::new(),
            total_cost: Decimal::ZERO,
            consumed: HashMap::new(),
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The catalog this session books against.
    #[must_use]
    pub const fn catalog(&self) -> &'a [Spool] {
        self.catalog
    }

    /// The selected spool, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&'a Spool> {
        match self.state {
            SessionState::SpoolSelected { index } => self.catalog.get(index),
            _ => None,
        }
    }

    /// Entries booked so far.
    #[must_use]
    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    /// Running total of booked costs.
    #[must_use]
    pub const fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    /// Grams of `spool` still available to this session.
    #[must_use]
    pub fn available(&self, spool: &Spool) -> Decimal {
        let used = self.consumed.get(&spool.id).copied().unwrap_or_default();
        spool.remaining_weight - used
    }

    /// Select a spool by its 1-based catalog number.
    ///
    /// Selecting while another spool is selected abandons that spool. An
    /// invalid choice leaves the session waiting for a selection.
    pub fn select(&mut self, choice: &str) -> Result<&'a Spool, AccountingError> {
        match self.state {
            SessionState::Finished => return Err(AccountingError::SessionFinished),
            SessionState::Accounted => self.state = SessionState::Idle,
            SessionState::Idle | SessionState::SpoolSelected { .. } => {}
        }

        let index = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < self.catalog.len())
            .ok_or_else(|| AccountingError::InvalidSelection {
                choice: choice.trim().to_string(),
                count: self.catalog.len(),
            })?;

        let catalog = self.catalog;
        let spool = &catalog[index];
        tracing::debug!(spool = %spool.id, index, "spool selected");
        self.state = SessionState::SpoolSelected { index };
        Ok(spool)
    }

    /// Drop the current selection without booking anything.
    pub fn abandon(&mut self) {
        if matches!(self.state, SessionState::SpoolSelected { .. }) {
            tracing::debug!("selection abandoned");
            self.state = SessionState::Idle;
        }
    }

    /// Book `quantity` (e.g. `"100g"`, `"1.34m"`) against the selected spool.
    ///
    /// On a malformed quantity or exceeded inventory the spool stays
    /// selected so that a corrected quantity can be entered. A spool that
    /// cannot be priced is deselected.
    pub fn account(&mut self, quantity: &str) -> Result<&UsageEntry, AccountingError> {
        let index = match self.state {
            SessionState::SpoolSelected { index } => index,
            SessionState::Finished => return Err(AccountingError::SessionFinished),
            SessionState::Idle | SessionState::Accounted => {
                return Err(AccountingError::NoSpoolSelected)
            }
        };
        let catalog = self.catalog;
        let spool = &catalog[index];

        let input = quantity;
        let quantity = parse_quantity(input)?;
        let grams_per_meter = match quantity.unit {
            Unit::Grams => Decimal::ONE,
            Unit::Meters => {
                let grams_per_meter =
                    mass_per_length(spool.filament.diameter_mm, spool.filament.density_g_cm3);
                if grams_per_meter <= Decimal::ZERO {
                    return Err(AccountingError::InvalidConfiguration {
                        id: spool.id,
                        density: spool.filament.density_g_cm3,
                    });
                }
                grams_per_meter
            }
        };
        let grams = quantity.to_grams(grams_per_meter).ok_or_else(|| {
            QuantityError::OutOfRange {
                input: input.trim().to_string(),
            }
        })?;

        let available = self.available(spool);
        if grams > available {
            return Err(AccountingError::InventoryExceeded {
                requested: grams,
                available,
            });
        }

        let cost = match spool.cost_of(grams) {
            Ok(cost) => cost,
            Err(source) => {
                self.state = SessionState::Idle;
                return Err(AccountingError::Cost {
                    id: spool.id,
                    source,
                });
            }
        };

        let Some(total_cost) = self.total_cost.checked_add(cost) else {
            self.state = SessionState::Idle;
            return Err(AccountingError::Cost {
                id: spool.id,
                source: CostError::Overflow,
            });
        };
        *self.consumed.entry(spool.id).or_default() += grams;
        self.total_cost = total_cost;
        self.state = SessionState::Accounted;
        tracing::debug!(spool = %spool.id, %grams, %cost, total = %self.total_cost, "usage booked");

        self.entries.push(UsageEntry {
            spool_id: spool.id,
            spool_name: spool.name().to_string(),
            quantity,
            grams,
            cost,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Return to `Idle` after a booked entry.
    pub fn resume(&mut self) {
        if self.state == SessionState::Accounted {
            self.state = SessionState::Idle;
        }
    }

    /// Close the session and take its summary.
    ///
    /// Any pending selection is dropped.
    pub fn finish(&mut self) -> Result<SessionSummary, AccountingError> {
        if self.state == SessionState::Finished {
            return Err(AccountingError::SessionFinished);
        }
        self.state = SessionState::Finished;
        tracing::debug!(entries = self.entries.len(), total = %self.total_cost, "session finished");
        Ok(SessionSummary {
            entries: std::mem::take(&mut self.entries),
            total_cost: self.total_cost,
        })
    }
}
