//! Snapshot pipeline: mirror update → snapshot create → publish switch.
//!
//! Steps run strictly sequentially per repo and across repos; there is no
//! parallel fan-out. The pipeline mutates external aptly state only — the
//! last-update record is the orchestrator's responsibility.

use chrono::{DateTime, Local};

use aptsnap_core::types::{Branch, BranchName, Repo};

use crate::error::SyncError;
use crate::runner::ToolRunner;

/// Deterministic snapshot name: `{mirror}-{branch}-{dist}-{run:%Y%m%d%H%M}`.
pub fn snapshot_name(repo: &Repo, run_stamp: DateTime<Local>) -> String {
    format!("{}-{}", repo.mirror_id(), run_stamp.format("%Y%m%d%H%M"))
}

/// Refresh every repo of `branch` and switch its publish endpoint to the new
/// snapshots.
///
/// Per repo, in declared order:
/// 1. `aptly mirror update {mirror_id}`
/// 2. `aptly snapshot create {snapshot} from mirror {mirror_id}`
/// 3. `aptly publish switch -component={branch} -gpg-provider=internal
///    -passphrase={passphrase} {dist} {endpoint} {snapshot}`
pub fn refresh_branch(
    name: &BranchName,
    branch: &Branch,
    run_stamp: DateTime<Local>,
    passphrase: &str,
    runner: &dyn ToolRunner,
) -> Result<(), SyncError> {
    tracing::info!("updating repos of branch {name}");

    for repo in &branch.repos {
        let mirror_id = repo.mirror_id();
        let snapshot = snapshot_name(repo, run_stamp);
        tracing::info!("updating {mirror_id} with snapshot {snapshot}");

        runner.run(
            "aptly",
            &["mirror".into(), "update".into(), mirror_id.clone()],
        )?;
        runner.run(
            "aptly",
            &[
                "snapshot".into(),
                "create".into(),
                snapshot.clone(),
                "from".into(),
                "mirror".into(),
                mirror_id,
            ],
        )?;
        runner.run(
            "aptly",
            &[
                "publish".into(),
                "switch".into(),
                format!("-component={}", repo.branch),
                "-gpg-provider=internal".into(),
                format!("-passphrase={passphrase}"),
                repo.dist.clone(),
                branch.publish_endpoint.clone(),
                snapshot,
            ],
        )?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::TimeZone;

    use aptsnap_core::types::MirrorName;

    /// Records every invocation instead of spawning anything.
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl RecordingRunner {
        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.borrow().clone()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<(), SyncError> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(())
        }
    }

    fn run_stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2019, 11, 8, 15, 4, 51).unwrap()
    }

    fn stable_branch() -> Branch {
        Branch {
            mirror: MirrorName::from("deb"),
            publish_endpoint: "filesystem:publish:stable".to_string(),
            repos: vec![
                Repo {
                    mirror: "deb".into(),
                    branch: "stable".into(),
                    dist: "buster".into(),
                },
                Repo {
                    mirror: "deb".into(),
                    branch: "stable".into(),
                    dist: "bullseye".into(),
                },
            ],
        }
    }

    #[test]
    fn snapshot_name_is_deterministic_to_the_minute() {
        let repo = &stable_branch().repos[0];
        let a = snapshot_name(repo, run_stamp());
        let b = snapshot_name(repo, run_stamp());
        assert_eq!(a, b);
        assert_eq!(a, "deb-stable-buster-201911081504");
    }

    #[test]
    fn seconds_do_not_affect_snapshot_names() {
        let repo = &stable_branch().repos[0];
        let early = Local.with_ymd_and_hms(2019, 11, 8, 15, 4, 2).unwrap();
        let late = Local.with_ymd_and_hms(2019, 11, 8, 15, 4, 59).unwrap();
        assert_eq!(snapshot_name(repo, early), snapshot_name(repo, late));
    }

    #[test]
    fn repos_are_refreshed_in_declared_order() {
        let runner = RecordingRunner::default();
        refresh_branch(
            &BranchName::from("stable"),
            &stable_branch(),
            run_stamp(),
            "sekrit",
            &runner,
        )
        .expect("refresh");

        let calls = runner.calls();
        assert_eq!(calls.len(), 6, "three steps per repo, two repos");

        // Repo one, step by step.
        assert_eq!(
            calls[0],
            (
                "aptly".to_string(),
                vec![
                    "mirror".to_string(),
                    "update".to_string(),
                    "deb-stable-buster".to_string()
                ]
            )
        );
        assert_eq!(
            calls[1],
            (
                "aptly".to_string(),
                vec![
                    "snapshot".to_string(),
                    "create".to_string(),
                    "deb-stable-buster-201911081504".to_string(),
                    "from".to_string(),
                    "mirror".to_string(),
                    "deb-stable-buster".to_string()
                ]
            )
        );
        assert_eq!(
            calls[2],
            (
                "aptly".to_string(),
                vec![
                    "publish".to_string(),
                    "switch".to_string(),
                    "-component=stable".to_string(),
                    "-gpg-provider=internal".to_string(),
                    "-passphrase=sekrit".to_string(),
                    "buster".to_string(),
                    "filesystem:publish:stable".to_string(),
                    "deb-stable-buster-201911081504".to_string()
                ]
            )
        );

        // Repo two follows repo one completely.
        assert_eq!(calls[3].1[2], "deb-stable-bullseye");
        assert_eq!(calls[4].1[2], "deb-stable-bullseye-201911081504");
        assert_eq!(calls[5].1[5], "bullseye");
    }

    #[test]
    fn branch_without_repos_invokes_nothing() {
        let runner = RecordingRunner::default();
        let branch = Branch {
            mirror: MirrorName::from("deb"),
            publish_endpoint: "filesystem:publish:empty".to_string(),
            repos: vec![],
        };
        refresh_branch(
            &BranchName::from("empty"),
            &branch,
            run_stamp(),
            "sekrit",
            &runner,
        )
        .expect("refresh");
        assert!(runner.calls().is_empty());
    }
}
