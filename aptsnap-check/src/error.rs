//! Error types for aptsnap-check.

use thiserror::Error;

/// All errors that can arise from checking upstream release metadata.
///
/// Every variant is fatal to the run; [`CheckError::Status`] additionally
/// drives the CLI's distinguished exit code.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A repo descriptor with an empty distribution name — rejected before
    /// any network call.
    #[error("empty distribution name for mirror '{mirror_id}'")]
    EmptyDist { mirror_id: String },

    /// DNS/connect/timeout failure reaching the upstream release document.
    #[error("transport failure fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// Upstream answered with a non-200 status.
    #[error("unexpected HTTP status {code} from {url}: {body}")]
    Status { code: u16, url: String, body: String },

    /// The response arrived but its body could not be read.
    #[error("failed reading release body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The release document contained no `Date:` line.
    #[error("no Date: line in release document from {url}")]
    MissingDate { url: String },

    /// A `Date:` line was present but its value did not parse.
    #[error("unparsable Date: value {value:?} in release document from {url}")]
    DateFormat { url: String, value: String },
}
