//! Worktree registration for Repository.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use super::Repository;
use crate::git::{RegisteredWorktree, parse_worktree_list};

/// What a newly registered worktree checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// Create `branch` at `start_point` (HEAD when `None`).
    NewBranch {
        branch: String,
        start_point: Option<String>,
    },
    /// Attach an existing local branch.
    Existing { branch: String },
    /// Create `branch` tracking `remote_ref` (e.g. `origin/feature`).
    Tracking { branch: String, remote_ref: String },
    /// Detached HEAD at `commit`.
    Detached { commit: String },
}

impl Repository {
    /// Worktrees git knows about, main worktree first.
    pub fn list_registered_worktrees(&self) -> anyhow::Result<Vec<RegisteredWorktree>> {
        let stdout = self.run_command(&["worktree", "list", "--porcelain"])?;
        parse_worktree_list(&stdout)
    }

    /// Path of the main worktree (the one holding the repository's `.git`).
    pub fn main_worktree_path(&self) -> anyhow::Result<PathBuf> {
        self.list_registered_worktrees()?
            .into_iter()
            .next()
            .map(|wt| wt.path)
            .context("git worktree list returned no entries")
    }

    /// `git worktree add` at `path`.
    pub fn register_worktree(
        &self,
        path: &Path,
        checkout: &Checkout,
        force: bool,
    ) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy().into_owned();
        let path_str = path_str.as_str();
        let mut args: Vec<&str> = vec!["worktree", "add"];
        if force {
            args.push("--force");
        }
        match checkout {
            Checkout::NewBranch {
                branch,
                start_point,
            } => {
                args.extend(["-b", branch.as_str(), path_str]);
                if let Some(start) = start_point {
                    args.push(start.as_str());
                }
            }
            Checkout::Existing { branch } => args.extend([path_str, branch.as_str()]),
            Checkout::Tracking { branch, remote_ref } => {
                args.extend([
                    "--track",
                    "-b",
                    branch.as_str(),
                    path_str,
                    remote_ref.as_str(),
                ]);
            }
            Checkout::Detached { commit } => {
                args.extend(["--detach", path_str, commit.as_str()]);
            }
        }
        self.run_command(&args)?;
        Ok(())
    }

    /// `git worktree remove`; with `force`, uncommitted changes are discarded.
    pub fn unregister_worktree(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy().into_owned();
        let mut args: Vec<&str> = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(path_str.as_str());

        let output = self.run_raw(&args)?;
        if !output.status.success() {
            bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(())
    }

    /// Drop registrations whose directories no longer exist.
    pub fn prune_worktrees(&self) -> anyhow::Result<()> {
        self.run_command(&["worktree", "prune"])?;
        Ok(())
    }

    /// Append `pattern` to the repository's `info/exclude` unless already listed.
    ///
    /// Returns whether the file was changed.
    pub fn ensure_excluded(&self, pattern: &str) -> anyhow::Result<bool> {
        let info_dir = self.git_common_dir()?.join("info");
        let exclude = info_dir.join("exclude");

        let existing = match std::fs::read_to_string(&exclude) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", exclude.display()));
            }
        };
        if existing.lines().any(|line| line.trim() == pattern) {
            return Ok(false);
        }

        let mut updated = existing;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(pattern);
        updated.push('\n');

        std::fs::create_dir_all(&info_dir)
            .with_context(|| format!("Failed to create {}", info_dir.display()))?;
        std::fs::write(&exclude, updated)
            .with_context(|| format!("Failed to write {}", exclude.display()))?;
        log::debug!("Added {pattern} to {}", exclude.display());
        Ok(true)
    }
}
