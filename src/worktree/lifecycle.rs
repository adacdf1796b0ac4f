//! Creating, checking out and deleting worktrees under the root.
//!
//! Preconditions are checked before anything destructive happens, and a
//! worktree is only ever removed from disk after git has let go of it.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use color_print::cformat;

use super::copy::{CopyReport, copy_patterns};
use super::index::{WorktreeIndex, read_linkage};
use super::naming::{branch_to_folder, time_travel_folder};
use super::resolve::resolve;
use super::Worktree;
use crate::config::Config;
use crate::git::{Checkout, Repository, WorktreeError};
use crate::path::{canonicalize_best_effort, format_path_for_display};
use crate::prompt::Prompt;
use crate::styling::{eprintln, warning_message};
use crate::utils::disk_usage;

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Start point for the new branch; the repository's HEAD when `None`.
    pub base: Option<String>,
    /// Copy-on-create patterns, on top of the configured ones.
    pub copy: Vec<String>,
    /// Passed to `git worktree add --force`.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// A worktree for the branch was already there.
    Switched(Worktree),
    /// An existing local branch was attached.
    Attached(Worktree),
    /// A local branch was created tracking `remote_ref`.
    Tracking { worktree: Worktree, remote_ref: String },
}

impl CheckoutOutcome {
    pub fn worktree(&self) -> &Worktree {
        match self {
            CheckoutOutcome::Switched(w) | CheckoutOutcome::Attached(w) => w,
            CheckoutOutcome::Tracking { worktree, .. } => worktree,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamStatus {
    NoUpstream,
    Tracking { upstream: String, ahead: usize },
}

/// Dry-run diagnostics for a worktree about to be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub worktree: Worktree,
    pub dirty: bool,
    pub upstream: UpstreamStatus,
    pub disk_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    DryRun(DeleteReport),
    Removed(Worktree),
}

/// How a collision names the repository owning a worktree.
fn owner_name(project: Option<String>, common_dir: &Path) -> String {
    project.unwrap_or_else(|| common_dir.display().to_string())
}

pub struct Lifecycle<'a> {
    config: &'a Config,
}

impl<'a> Lifecycle<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn index(&self) -> WorktreeIndex<'a> {
        WorktreeIndex::new(self.config)
    }

    /// Where the worktree for `branch` lives.
    pub fn target_path(&self, branch: &str) -> PathBuf {
        self.config
            .worktrees_root
            .join(branch_to_folder(branch, self.config.folder_separator))
    }

    fn ensure_root(&self) -> anyhow::Result<()> {
        let root = &self.config.worktrees_root;
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", format_path_for_display(root)))
    }

    /// Re-read a worktree git just registered.
    fn registered(&self, path: &Path) -> anyhow::Result<Worktree> {
        self.index()
            .worktree_at(path)?
            .with_context(|| format!("git did not register {}", path.display()))
    }

    /// Start a new branch in a new worktree.
    ///
    /// Returns the worktree and what copy-on-create did.
    pub fn create(
        &self,
        repo: &Repository,
        branch: &str,
        options: &CreateOptions,
    ) -> anyhow::Result<(Worktree, CopyReport)> {
        if branch.is_empty() {
            bail!("A branch name is required");
        }
        if repo.local_branch_exists(branch)? {
            return Err(WorktreeError::BranchExists {
                branch: branch.to_string(),
            }
            .into());
        }

        let target = self.target_path(branch);
        if target.exists() {
            self.replace_leftover(repo, &target)?;
        }

        self.ensure_root()?;
        repo.register_worktree(
            &target,
            &Checkout::NewBranch {
                branch: branch.to_string(),
                start_point: options.base.clone(),
            },
            options.force,
        )?;

        let patterns: Vec<String> = self
            .config
            .copy
            .iter()
            .chain(&options.copy)
            .cloned()
            .collect();
        let report = if patterns.is_empty() {
            CopyReport::default()
        } else {
            copy_patterns(&repo.main_worktree_path()?, &target, &patterns)?
        };

        Ok((self.registered(&target)?, report))
    }

    /// Open `branch` in its worktree, creating the worktree if needed.
    pub fn checkout(
        &self,
        repo: &Repository,
        branch: &str,
        force: bool,
    ) -> anyhow::Result<CheckoutOutcome> {
        if branch.is_empty() {
            bail!("A branch name is required");
        }
        let target = self.target_path(branch);
        if let Some(existing) = self.own_worktree_at(repo, &target)? {
            return Ok(CheckoutOutcome::Switched(existing));
        }

        let remote = &self.config.remote;
        let checkout = if repo.local_branch_exists(branch)? {
            Checkout::Existing {
                branch: branch.to_string(),
            }
        } else if repo.remote_branch_exists(remote, branch)? {
            Checkout::Tracking {
                branch: branch.to_string(),
                remote_ref: format!("{remote}/{branch}"),
            }
        } else {
            return Err(WorktreeError::BranchNotFound {
                branch: branch.to_string(),
                remote: remote.clone(),
            }
            .into());
        };

        self.clear_collision(&target, force)?;
        self.ensure_root()?;
        repo.register_worktree(&target, &checkout, false)?;
        let worktree = self.registered(&target)?;

        Ok(match checkout {
            Checkout::Tracking { remote_ref, .. } => CheckoutOutcome::Tracking {
                worktree,
                remote_ref,
            },
            _ => CheckoutOutcome::Attached(worktree),
        })
    }

    /// Clear whatever occupies `target` so `create` can register it.
    ///
    /// Another repository's live worktree is refused. One of `repo`'s own is
    /// unregistered first, and the directory is only removed once that worked.
    fn replace_leftover(&self, repo: &Repository, target: &Path) -> anyhow::Result<()> {
        if let Some(linkage) = read_linkage(target)
            && linkage.is_live()
        {
            let own = canonicalize_best_effort(&repo.git_common_dir()?);
            if linkage.common_dir != own {
                return Err(WorktreeError::FolderCollision {
                    path: target.to_path_buf(),
                    owner: Some(owner_name(linkage.project(), &linkage.common_dir)),
                }
                .into());
            }
            if let Err(e) = repo.unregister_worktree(target, true) {
                return Err(WorktreeError::RegistrationRemovalFailed {
                    path: target.to_path_buf(),
                    error: format!("{e:#}"),
                }
                .into());
            }
        }

        eprintln!(
            "{}",
            warning_message(cformat!(
                "Replacing existing folder <bold>{}</>",
                format_path_for_display(target)
            ))
        );
        if target.exists() {
            std::fs::remove_dir_all(target)
                .with_context(|| format!("Failed to remove {}", target.display()))?;
        }
        repo.prune_worktrees()
    }

    /// A live worktree already at `target`, if it is `repo`'s.
    ///
    /// Another repository's worktree there is a `FolderCollision`.
    fn own_worktree_at(
        &self,
        repo: &Repository,
        target: &Path,
    ) -> anyhow::Result<Option<Worktree>> {
        let Some(existing) = self.index().worktree_at(target)? else {
            return Ok(None);
        };
        if existing.belongs_to(&repo.git_common_dir()?) {
            return Ok(Some(existing));
        }
        Err(WorktreeError::FolderCollision {
            path: target.to_path_buf(),
            owner: Some(owner_name(existing.project, &existing.common_dir)),
        }
        .into())
    }

    /// A non-worktree folder at `target` blocks unless `force` removes it.
    fn clear_collision(&self, target: &Path, force: bool) -> anyhow::Result<()> {
        if !target.exists() {
            return Ok(());
        }
        if !force {
            return Err(WorktreeError::FolderCollision {
                path: target.to_path_buf(),
                owner: None,
            }
            .into());
        }
        eprintln!(
            "{}",
            warning_message(cformat!(
                "Removing <bold>{}</> to make room",
                format_path_for_display(target)
            ))
        );
        std::fs::remove_dir_all(target)
            .with_context(|| format!("Failed to remove {}", target.display()))
    }

    /// Detached worktree of `branch` as it was at the end of `date`.
    ///
    /// An existing time-travel worktree for the same branch and date is reused;
    /// the `bool` is `true` when a new one was created.
    pub fn time_travel(
        &self,
        repo: &Repository,
        branch: &str,
        date: NaiveDate,
    ) -> anyhow::Result<(Worktree, bool)> {
        let target = self.config.worktrees_root.join(time_travel_folder(
            branch,
            date,
            self.config.folder_separator,
        ));
        if let Some(existing) = self.own_worktree_at(repo, &target)? {
            return Ok((existing, false));
        }

        let remote = &self.config.remote;
        let rev = if repo.local_branch_exists(branch)? {
            branch.to_string()
        } else if repo.remote_branch_exists(remote, branch)? {
            format!("{remote}/{branch}")
        } else {
            return Err(WorktreeError::BranchNotFound {
                branch: branch.to_string(),
                remote: remote.clone(),
            }
            .into());
        };

        let commit = repo.find_commit_before(&rev, date)?.ok_or_else(|| {
            WorktreeError::NoCommitBefore {
                branch: branch.to_string(),
                date: date.format("%Y-%m-%d").to_string(),
            }
        })?;
        log::debug!("{rev} as of {date} is {commit}");

        self.clear_collision(&target, false)?;
        self.ensure_root()?;
        repo.register_worktree(&target, &Checkout::Detached { commit }, false)?;
        Ok((self.registered(&target)?, true))
    }

    /// What deleting `worktree` would lose.
    pub fn inspect(&self, worktree: &Worktree) -> anyhow::Result<DeleteReport> {
        let dirty = worktree.is_dirty()?;
        let upstream = match worktree.upstream()? {
            Some(upstream) => {
                let ahead = worktree.repo().ahead_count(&upstream)?;
                UpstreamStatus::Tracking { upstream, ahead }
            }
            None => UpstreamStatus::NoUpstream,
        };
        Ok(DeleteReport {
            worktree: worktree.clone(),
            dirty,
            upstream,
            disk_usage: disk_usage(&worktree.path),
        })
    }

    /// Unregister and remove the worktree `partial` resolves to.
    ///
    /// With `dry_run`, only reports; nothing is touched.
    pub fn delete(
        &self,
        partial: &str,
        force: bool,
        dry_run: bool,
        prompt: &mut dyn Prompt,
    ) -> anyhow::Result<DeleteOutcome> {
        let worktree = resolve(&self.index(), partial, prompt)?;
        if dry_run {
            return Ok(DeleteOutcome::DryRun(self.inspect(&worktree)?));
        }

        if !force && worktree.is_dirty()? {
            return Err(WorktreeError::DirtyWorktree {
                path: worktree.path.clone(),
            }
            .into());
        }

        // Run from the main worktree: the one being removed may be our cwd
        let main = Repository::at(Repository::at(&worktree.path).main_worktree_path()?);
        if let Err(e) = main.unregister_worktree(&worktree.path, force) {
            return Err(WorktreeError::RegistrationRemovalFailed {
                path: worktree.path.clone(),
                error: format!("{e:#}"),
            }
            .into());
        }

        if worktree.path.exists() {
            std::fs::remove_dir_all(&worktree.path)
                .with_context(|| format!("Failed to remove {}", worktree.path.display()))?;
        }
        Ok(DeleteOutcome::Removed(worktree))
    }

    /// Remove stale folders under the root and prune `repo`'s registrations.
    ///
    /// Returns the folders removed.
    pub fn prune(&self, repo: Option<&Repository>) -> anyhow::Result<Vec<PathBuf>> {
        let stale = self.index().stale_folders()?;
        for dir in &stale {
            std::fs::remove_dir_all(dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
        }
        if let Some(repo) = repo {
            repo.prune_worktrees()?;
        }
        Ok(stale)
    }
}
