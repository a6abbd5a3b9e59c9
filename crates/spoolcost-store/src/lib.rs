//! Snapshot files for spoolcost.
//!
//! Snapshots are written once as pretty-printed JSON arrays of
//! [`SpoolRecord`]s, in files named after their capture time:
//!
//! ```text
//! snapshot_2024-05-01_18-30-00.json
//! ```
//!
//! Loading a snapshot recovers the capture time from the file name when it
//! follows that pattern.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use spoolcost_core::Snapshot;
//! use spoolcost_store::{load_snapshot, save_snapshot};
//! use std::path::Path;
//!
//! let snapshot = Snapshot::default();
//! let path = save_snapshot(Path::new("."), &snapshot, Local::now().naive_local())?;
//! let again = load_snapshot(&path)?;
//! assert_eq!(again.len(), snapshot.len());
//! # Ok::<(), spoolcost_store::SnapshotError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use chrono::NaiveDateTime;
use spoolcost_core::{Snapshot, SpoolRecord};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name prefix of snapshot files.
pub const SNAPSHOT_PREFIX: &str = "snapshot_";

/// File name extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Format of the capture time inside a snapshot file name.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Errors that can occur reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file is missing or unreadable.
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The snapshot file is not a valid snapshot.
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        /// The corrupt file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot {path}: {source}")]
    Encode {
        /// The file that was to be written.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot file could not be written.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// File name for a snapshot captured at `captured_at`.
#[must_use]
pub fn snapshot_file_name(captured_at: NaiveDateTime) -> String {
    format!(
        "{SNAPSHOT_PREFIX}{}.{SNAPSHOT_EXTENSION}",
        captured_at.format(TIMESTAMP_FORMAT)
    )
}

/// Capture time encoded in a snapshot file name, if any.
#[must_use]
pub fn capture_time(path: &Path) -> Option<NaiveDateTime> {
    let name = path.file_name()?.to_str()?;
    let stamp = name
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(SNAPSHOT_EXTENSION)?
        .strip_suffix('.')?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

/// Write `snapshot` to a new timestamped file in `dir`.
///
/// Snapshot files are never overwritten; if a file for the same second
/// already exists this fails with [`SnapshotError::Write`].
pub fn save_snapshot(
    dir: &Path,
    snapshot: &Snapshot,
    captured_at: NaiveDateTime,
) -> Result<PathBuf, SnapshotError> {
    let path = dir.join(snapshot_file_name(captured_at));

    let mut json =
        serde_json::to_string_pretty(snapshot.records()).map_err(|source| SnapshotError::Encode {
            path: path.clone(),
            source,
        })?;
    json.push('\n');

    let write_err = |source| SnapshotError::Write {
        path: path.clone(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;

    tracing::debug!(path = %path.display(), records = snapshot.len(), "snapshot written");
    Ok(path)
}

/// Read a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<SpoolRecord> =
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut snapshot = Snapshot::new(records);
    if let Some(captured_at) = capture_time(path) {
        snapshot = snapshot.with_captured_at(captured_at);
    }

    tracing::debug!(path = %path.display(), records = snapshot.len(), "snapshot loaded");
    Ok(snapshot)
}
