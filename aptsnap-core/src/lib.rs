//! aptsnap core library — configuration model, state store, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`config`] — JSON config loading + validation
//! - [`state`] — per-branch last-update persistence
//! - [`error`] — [`ConfigError`], [`StateError`]

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::{Config, STABLE_BRANCH};
pub use error::{ConfigError, StateError};
pub use types::{Branch, BranchName, MirrorName, Repo};
