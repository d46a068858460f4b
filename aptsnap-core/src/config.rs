//! JSON configuration model and loader.
//!
//! The configuration is loaded once at startup and passed by reference into
//! every component; nothing reads it ambiently.
//!
//! # Shape
//!
//! ```json
//! {
//!   "repo_base_url": "http://deb.example.org/",
//!   "dt_format": "%Y-%m-%d %H:%M:%S",
//!   "log_path": "/var/log/aptsnap.log",
//!   "file_path": "/var/lib/aptsnap",
//!   "local_repo_root": "/srv/aptly/public",
//!   "stable_remote": "mirror@remote:/srv/repo/",
//!   "branches": {
//!     "stable": {
//!       "mirror": "deb",
//!       "publish_endpoint": "filesystem:publish:stable",
//!       "repos": [ {"mirror": "deb", "branch": "stable", "dist": "buster"} ]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Branch, BranchName};

/// The branch whose update flag gates the remote sync.
pub const STABLE_BRANCH: &str = "stable";

/// Root configuration for a run.
///
/// Branches live in a `BTreeMap` so a cycle always visits them in a
/// deterministic order regardless of JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub repo_base_url: String,
    /// strftime-style pattern used for the persisted last-update instants.
    pub dt_format: String,
    pub log_path: PathBuf,
    /// Root directory for per-branch state files.
    pub file_path: PathBuf,
    pub local_repo_root: PathBuf,
    /// rsync target for the stable branch's published tree.
    pub stable_remote: String,
    #[serde(default)]
    pub branches: BTreeMap<BranchName, Branch>,
}

impl Config {
    /// The stable branch's configuration, if one is defined.
    pub fn stable_branch(&self) -> Option<&Branch> {
        self.branches.get(&BranchName::from(STABLE_BRANCH))
    }
}

/// Load and validate the configuration at `path`.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with
/// path + line context) if malformed JSON, and
/// `ConfigError::DuplicateEndpoint` when two branches share a publish
/// endpoint.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Publish endpoints must be unique per branch.
fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut seen: BTreeMap<&str, &BranchName> = BTreeMap::new();
    for (name, branch) in &config.branches {
        if let Some(first) = seen.insert(branch.publish_endpoint.as_str(), name) {
            return Err(ConfigError::DuplicateEndpoint {
                endpoint: branch.publish_endpoint.clone(),
                first: first.to_string(),
                second: name.to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_json() -> &'static str {
        r#"{
            "repo_base_url": "http://deb.example.org/",
            "dt_format": "%Y-%m-%d %H:%M:%S",
            "log_path": "/var/log/aptsnap.log",
            "file_path": "/var/lib/aptsnap",
            "local_repo_root": "/srv/aptly/public",
            "stable_remote": "mirror@remote:/srv/repo/",
            "branches": {
                "stable": {
                    "mirror": "deb",
                    "publish_endpoint": "filesystem:publish:stable",
                    "repos": [
                        {"mirror": "deb", "branch": "stable", "dist": "buster"},
                        {"mirror": "deb", "branch": "stable", "dist": "bullseye"}
                    ]
                },
                "testing": {
                    "mirror": "deb",
                    "publish_endpoint": "filesystem:publish:testing",
                    "repos": [
                        {"mirror": "deb", "branch": "testing", "dist": "bullseye"}
                    ]
                }
            }
        }"#
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn load_sample_config() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, sample_json());
        let config = load(&path).expect("load");

        assert_eq!(config.repo_base_url, "http://deb.example.org/");
        assert_eq!(config.branches.len(), 2);
        let stable = config.stable_branch().expect("stable branch");
        assert_eq!(stable.repos.len(), 2);
        assert_eq!(stable.repos[0].dist, "buster");
    }

    #[test]
    fn branches_iterate_in_name_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, sample_json());
        let config = load(&path).expect("load");
        let names: Vec<String> = config.branches.keys().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["stable", "testing"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "{ not json");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn duplicate_publish_endpoint_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let json = sample_json().replace("filesystem:publish:testing", "filesystem:publish:stable");
        let path = write_config(&dir, &json);
        let err = load(&path).unwrap_err();
        match err {
            ConfigError::DuplicateEndpoint {
                endpoint,
                first,
                second,
            } => {
                assert_eq!(endpoint, "filesystem:publish:stable");
                assert_eq!(first, "stable");
                assert_eq!(second, "testing");
            }
            other => panic!("expected duplicate endpoint, got {other:?}"),
        }
    }

    #[test]
    fn missing_stable_branch_is_none() {
        let dir = TempDir::new().expect("tempdir");
        let json = sample_json().replace("\"stable\":", "\"unstable\":");
        let path = write_config(&dir, &json);
        let config = load(&path).expect("load");
        assert!(config.stable_branch().is_none());
    }
}
