//! Capture the current inventory to a snapshot file.

use crate::catalog::CatalogSource;
use anyhow::Result;
use chrono::NaiveDateTime;
use spoolcost_core::Snapshot;
use spoolcost_store::save_snapshot;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fetch the catalog and write it to `output_dir` as a snapshot taken at
/// `captured_at`.
///
/// Returns the written file, or `None` when the catalog was empty and
/// nothing was written.
pub fn run<S, W>(
    source: &S,
    output_dir: &Path,
    captured_at: NaiveDateTime,
    out: &mut W,
) -> Result<Option<PathBuf>>
where
    S: CatalogSource + ?Sized,
    W: Write,
{
    let catalog = source.fetch_spools()?;
    if catalog.is_empty() {
        writeln!(out, "No spools found to snapshot.")?;
        return Ok(None);
    }

    let snapshot = Snapshot::from_catalog(&catalog).with_captured_at(captured_at);
    let path = save_snapshot(output_dir, &snapshot, captured_at)?;
    writeln!(out, "Snapshot saved to {}", path.display())?;
    Ok(Some(path))
}
