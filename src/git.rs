//! Git adapter: the only place that talks to `git`.

use std::path::PathBuf;

use anyhow::Context;

mod error;
mod repository;

pub use error::{LookupKind, WorktreeError, worktree_error};
pub use repository::{Checkout, Repository};

#[cfg(test)]
pub(crate) use repository::test_support as repository_test_support;

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredWorktree {
    pub path: PathBuf,
    pub head: String,
    pub branch: Option<String>,
    pub bare: bool,
    pub detached: bool,
    pub prunable: bool,
}

pub(crate) fn parse_worktree_list(output: &str) -> anyhow::Result<Vec<RegisteredWorktree>> {
    let mut worktrees = Vec::new();
    let mut current: Option<RegisteredWorktree> = None;

    for line in output.lines() {
        if line.is_empty() {
            if let Some(wt) = current.take() {
                worktrees.push(wt);
            }
            continue;
        }

        let (key, value) = match line.split_once(' ') {
            Some((k, v)) => (k, Some(v)),
            None => (line, None),
        };

        if key == "worktree" {
            if let Some(wt) = current.take() {
                worktrees.push(wt);
            }
            let path = value.context("worktree line missing path")?;
            current = Some(RegisteredWorktree {
                path: PathBuf::from(path),
                head: String::new(),
                branch: None,
                bare: false,
                detached: false,
                prunable: false,
            });
            continue;
        }

        let Some(wt) = current.as_mut() else {
            continue;
        };
        match key {
            "HEAD" => wt.head = value.context("HEAD line missing SHA")?.to_string(),
            "branch" => {
                let branch_ref = value.context("branch line missing ref")?;
                let branch = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
                wt.branch = Some(branch.to_string());
            }
            "bare" => wt.bare = true,
            "detached" => wt.detached = true,
            "prunable" => wt.prunable = true,
            // locked and future attributes
            _ => {}
        }
    }

    if let Some(wt) = current {
        worktrees.push(wt);
    }

    Ok(worktrees)
}
