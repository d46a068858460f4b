//! Domain types for the aptsnap configuration model.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde + serde_json.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a release branch (e.g. `stable`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchName(pub String);

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for a mirror namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MirrorName(pub String);

impl fmt::Display for MirrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for MirrorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MirrorName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One aptly mirror target: `(mirror, branch, dist)` identifies both the
/// local mirror name and the upstream Release URL suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub mirror: String,
    pub branch: String,
    pub dist: String,
}

impl Repo {
    /// The aptly mirror identifier: `{mirror}-{branch}-{dist}`.
    pub fn mirror_id(&self) -> String {
        format!("{}-{}-{}", self.mirror, self.branch, self.dist)
    }

    /// Upstream Release document URL under `base`.
    pub fn release_url(&self, base: &str) -> String {
        format!("{base}debian/dists/{}/Release", self.dist)
    }
}

/// A release branch: an ordered set of repos sharing a publish endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub mirror: MirrorName,
    pub publish_endpoint: String,
    #[serde(default)]
    pub repos: Vec<Repo>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
