//! Error types for aptsnap-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error on load — includes file path and line context from serde_json.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// Two branches share a publish endpoint; endpoints must be unique.
    #[error("publish endpoint '{endpoint}' is shared by branches '{first}' and '{second}'")]
    DuplicateEndpoint {
        endpoint: String,
        first: String,
        second: String,
    },
}

/// All errors that can arise from the last-update state store.
#[derive(Debug, Error)]
pub enum StateError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file's contents did not match the configured format.
    #[error("malformed last-update file {path}: {value:?} does not match format {format:?}")]
    Parse {
        path: PathBuf,
        value: String,
        format: String,
    },
}

/// Convenience constructor for [`StateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}
