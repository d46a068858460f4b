//! Full update cycle: decide → refresh → persist, then dispatch.
//!
//! This is the canonical entrypoint the CLI drives. Branches are visited
//! sequentially in name order; the run's local and UTC timestamps are
//! captured once up front so a long-running pipeline cannot miss updates
//! published while it works — state always advances to the cycle *start*
//! instant, never the completion instant.

use std::collections::BTreeMap;

use chrono::{Local, Utc};

use aptsnap_check::{update_required, ReleaseProbe};
use aptsnap_core::config::Config;
use aptsnap_core::state;
use aptsnap_core::types::BranchName;

use crate::dispatch;
use crate::error::CycleError;
use crate::pipeline;
use crate::runner::ToolRunner;

/// Which branches were refreshed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub updated: BTreeMap<BranchName, bool>,
}

impl CycleSummary {
    /// Names of the branches that were refreshed, in name order.
    pub fn updated_branches(&self) -> Vec<&BranchName> {
        self.updated
            .iter()
            .filter(|(_, flag)| **flag)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn any_updated(&self) -> bool {
        self.updated.values().any(|flag| *flag)
    }
}

/// Run one full update cycle.
///
/// For each configured branch: read the last-update record, decide whether a
/// refresh is required, and if so run the snapshot pipeline and advance the
/// record to the cycle-start UTC instant. After all branches, dispatch the
/// stable remote sync once.
///
/// A branch that needs refreshing without a supplied passphrase aborts the
/// cycle with [`CycleError::PassphraseRequired`] before any tool runs for it.
pub fn run(
    config: &Config,
    passphrase: Option<&str>,
    probe: &dyn ReleaseProbe,
    runner: &dyn ToolRunner,
) -> Result<CycleSummary, CycleError> {
    let cycle_local = Local::now();
    let cycle_utc = Utc::now();

    let mut updated: BTreeMap<BranchName, bool> = config
        .branches
        .keys()
        .map(|name| (name.clone(), false))
        .collect();

    tracing::info!(
        "update cycle started, checking {} branch(es) for updates",
        config.branches.len()
    );

    for (name, branch) in &config.branches {
        let state_path = state::state_path(&config.file_path, &branch.mirror, name);
        let last_update = state::read_last_update(&state_path, &config.dt_format)?;

        if update_required(name, branch, last_update, probe)? {
            let passphrase = passphrase.ok_or_else(|| CycleError::PassphraseRequired {
                branch: name.clone(),
            })?;
            pipeline::refresh_branch(name, branch, cycle_local, passphrase, runner)?;
            updated.insert(name.clone(), true);
            state::write_last_update(&state_path, cycle_utc, &config.dt_format)?;
        }
    }

    dispatch::sync_stable(config, &updated, runner)?;

    let summary = CycleSummary { updated };
    tracing::info!(
        "update cycle complete, updated {:?}",
        summary
            .updated_branches()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
