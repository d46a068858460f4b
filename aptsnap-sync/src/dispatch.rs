//! Remote sync of the stable branch's published tree.
//!
//! Only the stable branch's updated flag gates the transfer; other branches
//! updating in the same cycle do not trigger a sync.

use std::collections::BTreeMap;

use aptsnap_core::config::Config;
use aptsnap_core::types::BranchName;
use aptsnap_core::STABLE_BRANCH;

use crate::error::SyncError;
use crate::runner::ToolRunner;

/// One-way recursive sync-and-delete of the stable publish tree to the
/// configured remote, if stable was updated this run.
pub fn sync_stable(
    config: &Config,
    updated: &BTreeMap<BranchName, bool>,
    runner: &dyn ToolRunner,
) -> Result<(), SyncError> {
    let stable = BranchName::from(STABLE_BRANCH);
    if !updated.get(&stable).copied().unwrap_or(false) {
        tracing::debug!("stable branch unchanged this run; skipping remote sync");
        return Ok(());
    }
    let Some(branch) = config.stable_branch() else {
        tracing::debug!("no stable branch configured; skipping remote sync");
        return Ok(());
    };

    let source = config.local_repo_root.join(&branch.publish_endpoint);
    tracing::info!(
        "rsync from {} to {} started",
        source.display(),
        config.stable_remote
    );
    runner.run(
        "rsync",
        &[
            "-av".into(),
            "--delete".into(),
            source.display().to_string(),
            config.stable_remote.clone(),
        ],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
