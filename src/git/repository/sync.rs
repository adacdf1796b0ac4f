//! Fetch, stash, rebase, merge and push for Repository.
//!
//! Failures that the sync protocol recovers from (rebase, merge) come back as
//! `Ok(false)`. Everything else is an error carrying git's stderr.

use std::path::Path;

use anyhow::bail;
use chrono::NaiveDate;

use super::Repository;

impl Repository {
    fn run_expecting_success(&self, args: &[&str]) -> anyhow::Result<()> {
        let output = self.run_raw(args)?;
        if !output.status.success() {
            bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(())
    }

    pub fn fetch(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.run_expecting_success(&["fetch", remote, branch])
    }

    /// Stash tracked and untracked changes under `label`.
    pub fn stash_push(&self, label: &str) -> anyhow::Result<()> {
        self.run_expecting_success(&["stash", "push", "--include-untracked", "-m", label])
    }

    pub fn stash_pop(&self) -> anyhow::Result<()> {
        self.run_expecting_success(&["stash", "pop"])
    }

    /// Rebase the current branch onto `onto`; `false` when git stopped.
    pub fn rebase(&self, onto: &str) -> anyhow::Result<bool> {
        self.run_check(&["rebase", onto])
    }

    /// A stopped rebase is waiting for `--continue` or `--abort`.
    pub fn rebase_in_progress(&self) -> anyhow::Result<bool> {
        for state in ["rebase-merge", "rebase-apply"] {
            let stdout =
                self.run_command(&["rev-parse", "--path-format=absolute", "--git-path", state])?;
            if Path::new(stdout.trim()).exists() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn rebase_abort(&self) -> anyhow::Result<()> {
        self.run_expecting_success(&["rebase", "--abort"])
    }

    /// Merge `onto` into the current branch; `false` on conflicts.
    pub fn merge(&self, onto: &str) -> anyhow::Result<bool> {
        self.run_check(&["merge", "--no-edit", onto])
    }

    /// Stage everything and commit it.
    pub fn commit_all(&self, message: &str) -> anyhow::Result<()> {
        self.run_expecting_success(&["add", "-A"])?;
        self.run_expecting_success(&["commit", "-m", message])
    }

    pub fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> anyhow::Result<()> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("--set-upstream");
        }
        args.extend([remote, branch]);
        self.run_expecting_success(&args)
    }

    /// Last commit on `branch` at or before the end of `date` (committer time, local zone).
    pub fn find_commit_before(
        &self,
        branch: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<String>> {
        let before = format!("--before={} 23:59:59", date.format("%Y-%m-%d"));
        let stdout = self.run_command(&["rev-list", "-n", "1", &before, branch])?;
        let sha = stdout.trim();
        Ok((!sha.is_empty()).then(|| sha.to_string()))
    }
}
