//! Core types for spoolcost
//!
//! This crate holds the usage-accounting and snapshot-diff engine. It performs
//! no I/O:
//!
//! - [`Spool`] - A roll of filament with its economics and geometry
//! - [`mass_per_length`] - Grams per metre from diameter and density
//! - [`cost`] - Cost of consumed mass from spool price and nominal weight
//! - [`parse_quantity`] - Parse usage strings like `100g` or `1.34m`
//! - [`InventorySession`] - Select spools and book usage against inventory
//! - [`Snapshot`] - An immutable capture of the inventory
//! - [`diff`] - Reconcile two snapshots into a usage report
//!
//! # Example
//!
//! ```
//! use spoolcost_core::{diff, Filament, InventorySession, Snapshot, Spool};
//! use rust_decimal_macros::dec;
//!
//! let catalog = vec![
//!     Spool::new(1, dec!(20), dec!(1000), dec!(900))
//!         .with_filament(Filament::new("PLA Red")),
//! ];
//!
//! // Book a print against the catalog
//! let mut session = InventorySession::new(&catalog);
//! session.select("1").unwrap();
//! session.account("150g").unwrap();
//! let summary = session.finish().unwrap();
//! assert_eq!(summary.total_cost, dec!(3));
//!
//! // Compare two captures of the inventory
//! let before = Snapshot::from_catalog(&catalog);
//! let mut used = catalog.clone();
//! used[0].remaining_weight = dec!(750);
//! let after = Snapshot::from_catalog(&used);
//!
//! let report = diff(&before, &after, false).unwrap();
//! assert_eq!(report.total_weight_used, dec!(150));
//! assert_eq!(report.total_cost_used, dec!(3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cost;
pub mod diff;
pub mod quantity;
pub mod session;
pub mod snapshot;
pub mod spool;
pub mod units;

pub use cost::{cost, CostError};
pub use diff::{diff, DiffError, DiffRecord, DiffReport};
pub use quantity::{parse_quantity, QuantityError};
pub use session::{AccountingError, InventorySession, SessionState, SessionSummary, UsageEntry};
pub use snapshot::{RecordFilament, Snapshot, SpoolRecord, NOMINAL_SPOOL_WEIGHT};
pub use spool::{
    resolve_density, resolve_diameter, Filament, Spool, SpoolError, SpoolId,
    DEFAULT_DENSITY_G_CM3, DEFAULT_DIAMETER_MM, UNKNOWN_NAME,
};
pub use units::{mass_per_length, Quantity, Unit};

// Re-export commonly used external types
pub use chrono::NaiveDateTime;
pub use rust_decimal::Decimal;
