//! Per-branch update decision.
//!
//! Two rules, checked in order:
//! 1. Day rollover — the last recorded update's local calendar day is before
//!    today's local calendar day. Guarantees at least one refresh per day and
//!    skips the network entirely.
//! 2. Per-repo staleness — probe each repo in declared order and
//!    short-circuit on the first upstream instant strictly greater than the
//!    last recorded update.
//!
//! The rollover rule compares local calendar days; the persisted state and
//! the upstream comparison use UTC instants.

use chrono::{DateTime, Local, Utc};

use aptsnap_core::types::{Branch, BranchName};

use crate::error::CheckError;
use crate::release::ReleaseProbe;

/// Decide whether `branch` needs a refresh given its last recorded update.
///
/// Pure with respect to its inputs aside from the probe calls it performs;
/// never touches persisted state.
pub fn update_required(
    name: &BranchName,
    branch: &Branch,
    last_update: DateTime<Utc>,
    probe: &dyn ReleaseProbe,
) -> Result<bool, CheckError> {
    tracing::info!("checking {name} branch for updates since {last_update} UTC");

    if last_update.with_timezone(&Local).date_naive() < Local::now().date_naive() {
        tracing::info!("first snapshot of the day, update of {name} required");
        return Ok(true);
    }

    for repo in &branch.repos {
        tracing::info!("checking {} for updates", repo.dist);
        let remote_updated = probe.release_stamp(repo)?;
        if remote_updated > last_update {
            tracing::debug!(
                "new update for {}/{}: {} UTC",
                repo.dist,
                repo.branch,
                remote_updated
            );
            return Ok(true);
        }
    }

    Ok(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
