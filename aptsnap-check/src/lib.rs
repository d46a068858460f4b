//! # aptsnap-check
//!
//! Upstream release checking and the per-branch update decision.
//!
//! [`release::HttpProbe`] fetches a repo's Release document and extracts its
//! publication instant; [`decision::update_required`] combines the day
//! rollover fast path with short-circuiting per-repo staleness checks.

pub mod decision;
pub mod error;
pub mod release;

pub use decision::update_required;
pub use error::CheckError;
pub use release::{HttpProbe, ReleaseProbe};
