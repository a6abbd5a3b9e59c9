//! Filament cost tracking for 3D printing.
//!
//! This crate provides the `spoolcost` command-line tool, which works against
//! a Spoolman inventory server:
//!
//! - Interactive mode: pick spools, enter the filament a print used and get
//!   its cost
//! - `--snapshot`: save the current inventory to a timestamped JSON file
//! - `--compare`: report the filament used between two snapshots
//!
//! # Example Usage
//!
//! ```bash
//! spoolcost
//! spoolcost --snapshot --output-dir ~/snapshots
//! spoolcost --compare snapshot_2024-05-01_08-00-00.json snapshot_2024-05-08_08-00-00.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod cmd;
pub mod config;
pub mod report;
