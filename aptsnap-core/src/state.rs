//! Per-branch last-update state store.
//!
//! # Storage layout
//!
//! ```text
//! <file_path>/
//!   <mirror>-update-<branch>.date   (formatted instant, nothing else)
//! ```
//!
//! One file per branch. A missing file reads as the Unix-epoch sentinel, so
//! the first-ever run treats every branch as requiring an update. Writes use
//! the same atomic `.tmp` + rename pattern as the rest of the workspace.
//!
//! Instants are persisted with the configured strftime-style `dt_format` and
//! interpreted as naive UTC on the way back in. Concurrent runs of the tool
//! against the same files are a deployment-level concern (external lock);
//! within one run access is strictly sequential.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{io_err, StateError};
use crate::types::{BranchName, MirrorName};

/// `<file_path>/<mirror>-update-<branch>.date` — pure, no I/O.
pub fn state_path(file_path: &Path, mirror: &MirrorName, branch: &BranchName) -> PathBuf {
    file_path.join(format!("{mirror}-update-{branch}.date"))
}

/// Read the last-update instant from `path`.
///
/// Returns the Unix-epoch sentinel if the file does not exist. A file whose
/// trimmed contents do not parse with `dt_format` is a fatal
/// [`StateError::Parse`].
pub fn read_last_update(path: &Path, dt_format: &str) -> Result<DateTime<Utc>, StateError> {
    if !path.exists() {
        return Ok(DateTime::UNIX_EPOCH);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let trimmed = contents.trim();
    let parsed =
        NaiveDateTime::parse_from_str(trimmed, dt_format).map_err(|_| StateError::Parse {
            path: path.to_path_buf(),
            value: trimmed.to_string(),
            format: dt_format.to_string(),
        })?;
    Ok(parsed.and_utc())
}

/// Overwrite `path` with `instant` formatted per `dt_format`.
///
/// Writes to a `.tmp` sibling then renames, creating the parent directory if
/// needed, so a failed write never leaves a truncated state file behind.
pub fn write_last_update(
    path: &Path,
    instant: DateTime<Utc>,
    dt_format: &str,
) -> Result<(), StateError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let formatted = instant.format(dt_format).to_string();
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, &formatted).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
