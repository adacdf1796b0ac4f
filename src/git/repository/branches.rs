//! Branch-related operations for Repository.

use super::Repository;

impl Repository {
    /// Check if a local git branch exists.
    pub fn local_branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        self.run_check(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{branch}"),
        ])
    }

    /// Check if `<remote>/<branch>` exists as a remote-tracking ref.
    ///
    /// Only consults refs already fetched; never contacts the remote.
    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> anyhow::Result<bool> {
        self.run_check(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/remotes/{remote}/{branch}"),
        ])
    }

    /// Branch checked out here, or `None` when HEAD is detached.
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let stdout = self.run_command(&["branch", "--show-current"])?;
        let branch = stdout.trim();
        Ok((!branch.is_empty()).then(|| branch.to_string()))
    }

    /// Get the upstream tracking branch for the given branch.
    ///
    /// Uses `@{upstream}` syntax; a branch without one yields `None`.
    pub fn upstream_branch(&self, branch: &str) -> anyhow::Result<Option<String>> {
        let result = self.run_command(&["rev-parse", "--abbrev-ref", &format!("{branch}@{{u}}")]);

        match result {
            Ok(upstream) => {
                let trimmed = upstream.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Err(_) => Ok(None),
        }
    }

    /// Commits reachable from HEAD but not from `upstream`.
    pub fn ahead_count(&self, upstream: &str) -> anyhow::Result<usize> {
        let stdout = self.run_command(&["rev-list", "--count", &format!("{upstream}..HEAD")])?;
        stdout
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Unexpected rev-list count {:?}: {e}", stdout.trim()))
    }
}
