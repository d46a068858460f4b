//! Error types for aptsnap-sync.

use std::path::PathBuf;

use thiserror::Error;

use aptsnap_check::CheckError;
use aptsnap_core::error::StateError;
use aptsnap_core::types::BranchName;

/// All errors that can arise from invoking external tools.
///
/// A tool that spawns and exits non-zero is not an error here; only failing
/// to spawn at all (missing binary, permissions) surfaces.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// All errors that can abort a full update cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    /// An error from the release checker or update decision.
    #[error("check error: {0}")]
    Check(#[from] CheckError),

    /// An error from the last-update state store.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// An error from external-tool invocation.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// A branch needs republishing but no signing passphrase was supplied.
    #[error("branch '{branch}' needs publishing but no passphrase was given")]
    PassphraseRequired { branch: BranchName },
}
