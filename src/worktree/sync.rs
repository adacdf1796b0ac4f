//! Bring a worktree's branch up to date with the project's base branch.
//!
//! The protocol is strictly ordered: pick a source, fetch it (remote only),
//! stash local changes, rebase, fall back to merge, restore the stash. Nothing
//! is rolled back on failure; the error says what is left pending.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use color_print::cformat;

use super::Worktree;
use super::index::WorktreeIndex;
use super::resolve::resolve;
use crate::config::Config;
use crate::git::{Repository, WorktreeError};
use crate::path::format_path_for_display;
use crate::prompt::Prompt;
use crate::utils::timestamp_label;

/// Branch the worktree is synced onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSource {
    Remote { remote: String, branch: String },
    Local { branch: String },
}

impl SyncSource {
    /// Revision to hand to rebase/merge.
    pub fn rev(&self) -> String {
        match self {
            SyncSource::Remote { remote, branch } => format!("{remote}/{branch}"),
            SyncSource::Local { branch } => branch.clone(),
        }
    }
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rev())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SyncStrategy {
    Rebase,
    Merge,
}

/// What happened to local changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashState {
    /// The tree was clean.
    NotNeeded,
    Restored { label: String },
    /// Pop failed; the entry is still in `git stash list`.
    Kept { label: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub worktree: Worktree,
    pub source: SyncSource,
    pub strategy: SyncStrategy,
    pub stash: StashState,
}

/// Rebase onto `rev`, falling back to a merge; `None` when both conflict.
fn integrate(repo: &Repository, rev: &str) -> anyhow::Result<Option<SyncStrategy>> {
    if repo.rebase(rev)? {
        return Ok(Some(SyncStrategy::Rebase));
    }
    // A hook can refuse the rebase before it starts; then there is nothing to abort
    if repo.rebase_in_progress()? {
        log::debug!("Rebase onto {rev} stopped; aborting and merging instead");
        repo.rebase_abort()?;
    } else {
        log::debug!("Rebase onto {rev} did not start; merging instead");
    }
    Ok(repo.merge(rev)?.then_some(SyncStrategy::Merge))
}

pub struct SyncEngine<'a> {
    config: &'a Config,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> SyncEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            clock: Utc::now,
        }
    }

    /// Use `clock` instead of the system time for stash labels.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Sync the worktree `selector` resolves to, or the checkout containing
    /// `cwd` once the user confirms.
    pub fn sync(
        &self,
        selector: Option<&str>,
        cwd: &Path,
        prompt: &mut dyn Prompt,
    ) -> anyhow::Result<SyncOutcome> {
        let worktree = match selector {
            Some(partial) => resolve(&WorktreeIndex::new(self.config), partial, prompt)?,
            None => self.current_target(cwd, prompt)?,
        };
        self.sync_worktree(&worktree)
    }

    /// The checkout containing `cwd`, confirmed by the user.
    fn current_target(&self, cwd: &Path, prompt: &mut dyn Prompt) -> anyhow::Result<Worktree> {
        let repo = Repository::at(cwd);
        if !repo.is_inside_work_tree() {
            return Err(WorktreeError::NotAWorktree {
                path: cwd.to_path_buf(),
            }
            .into());
        }
        let top = repo.worktree_root()?;

        let worktree = match WorktreeIndex::new(self.config).worktree_at(&top)? {
            Some(worktree) => worktree,
            // Outside the root (e.g. the main checkout): sync it all the same
            None => {
                let repo = Repository::at(&top);
                let branch = repo
                    .current_branch()?
                    .ok_or_else(|| WorktreeError::DetachedHead { path: top.clone() })?;
                Worktree {
                    branch,
                    detached: false,
                    project: None,
                    common_dir: repo.git_common_dir()?,
                    path: top,
                }
            }
        };

        let question = cformat!(
            "Sync <bold>{}</> in {}?",
            worktree.branch,
            format_path_for_display(&worktree.path)
        );
        if !prompt.confirm(&question)? {
            return Err(WorktreeError::Cancelled.into());
        }
        Ok(worktree)
    }

    /// First configured base branch found on the remote, else locally.
    pub fn determine_source(&self, repo: &Repository) -> anyhow::Result<SyncSource> {
        let remote = &self.config.remote;
        for branch in &self.config.base_branches {
            if repo.remote_branch_exists(remote, branch)? {
                return Ok(SyncSource::Remote {
                    remote: remote.clone(),
                    branch: branch.clone(),
                });
            }
        }
        for branch in &self.config.base_branches {
            if repo.local_branch_exists(branch)? {
                return Ok(SyncSource::Local {
                    branch: branch.clone(),
                });
            }
        }
        Err(WorktreeError::NoBaseBranch {
            candidates: self.config.base_branches.clone(),
            remote: remote.clone(),
        }
        .into())
    }

    /// Run the protocol against an already-resolved worktree.
    pub fn sync_worktree(&self, worktree: &Worktree) -> anyhow::Result<SyncOutcome> {
        let repo = worktree.repo();
        let source = self.determine_source(&repo)?;
        log::debug!("Syncing {} onto {source}", worktree.branch);

        if let SyncSource::Remote { remote, branch } = &source
            && let Err(e) = repo.fetch(remote, branch)
        {
            return Err(WorktreeError::FetchFailed {
                remote: remote.clone(),
                branch: branch.clone(),
                error: format!("{e:#}"),
            }
            .into());
        }

        let stash_label = if repo.is_dirty()? {
            let label = format!(
                "wk-sync {} {}",
                worktree.branch,
                timestamp_label((self.clock)())
            );
            if let Err(e) = repo.stash_push(&label) {
                return Err(WorktreeError::StashFailed {
                    error: format!("{e:#}"),
                }
                .into());
            }
            log::debug!("Stashed local changes as {label:?}");
            Some(label)
        } else {
            None
        };

        let rev = source.rev();
        let strategy = match integrate(&repo, &rev) {
            Ok(Some(strategy)) => strategy,
            Ok(None) => {
                return Err(WorktreeError::SyncConflict {
                    branch: worktree.branch.clone(),
                    source: rev,
                    stash: stash_label,
                }
                .into());
            }
            Err(e) => {
                return Err(WorktreeError::SyncInterrupted {
                    branch: worktree.branch.clone(),
                    source: rev,
                    error: format!("{e:#}"),
                    stash: stash_label,
                }
                .into());
            }
        };

        let stash = match stash_label {
            None => StashState::NotNeeded,
            Some(label) => match repo.stash_pop() {
                Ok(()) => StashState::Restored { label },
                Err(e) => StashState::Kept {
                    label,
                    error: format!("{e:#}"),
                },
            },
        };

        Ok(SyncOutcome {
            worktree: worktree.clone(),
            source,
            strategy,
            stash,
        })
    }
}
