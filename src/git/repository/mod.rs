//! Repository context for git operations.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, bail};

use crate::shell_exec::Cmd;

mod branches;
mod sync;
mod worktrees;

pub use worktrees::Checkout;

/// A git checkout (main repository or linked worktree) addressed by path.
///
/// Every method shells out to `git` with this path as the working directory.
///
/// # Examples
///
/// ```no_run
/// use wtkit::git::Repository;
///
/// let repo = Repository::at("/path/to/worktree");
/// let branch = repo.current_branch()?;
/// let is_dirty = repo.is_dirty()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository context at the specified path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn log_context(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Run git and hand back the raw output, whatever the exit status.
    ///
    /// For commands whose failure is an expected outcome (rebase, merge,
    /// stash pop) and needs to be mapped to a semantic error by the caller.
    pub fn run_raw(&self, args: &[&str]) -> anyhow::Result<Output> {
        Cmd::new("git")
            .args(args.iter().copied())
            .current_dir(&self.path)
            .context(self.log_context())
            .run()
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))
    }

    /// Run git and return stdout; a non-zero exit becomes an error carrying stderr.
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = self.run_raw(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git and report only whether it exited successfully.
    pub fn run_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        Ok(self.run_raw(args)?.status.success())
    }

    /// Top of the working tree containing this path.
    pub fn worktree_root(&self) -> anyhow::Result<PathBuf> {
        let stdout = self.run_command(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    /// Shared `.git` directory of the repository, absolute.
    pub fn git_common_dir(&self) -> anyhow::Result<PathBuf> {
        let stdout = self.run_command(&["rev-parse", "--path-format=absolute", "--git-common-dir"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    pub fn is_inside_work_tree(&self) -> bool {
        self.run_command(&["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|out| out.trim() == "true")
    }

    /// Uncommitted or untracked changes present.
    pub fn is_dirty(&self) -> anyhow::Result<bool> {
        let stdout = self.run_command(&["status", "--porcelain"])?;
        Ok(!stdout.trim().is_empty())
    }
}
