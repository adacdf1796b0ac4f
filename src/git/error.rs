//! Semantic error kinds for worktree operations.
//!
//! Library code propagates `anyhow::Error`. The failures below are the ones a
//! caller (or a test) needs to tell apart, so they are a typed enum that is
//! converted with `.into()` and recovered with `downcast_ref::<WorktreeError>()`.

use std::fmt;
use std::path::PathBuf;

use color_print::cformat;

use crate::path::format_path_for_display;
use crate::styling::{error_message, format_with_gutter, hint_message};

/// What a failed lookup was searching by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Substring of a branch name
    Branch,
    /// Exact tag
    Tag,
}

#[derive(Debug)]
pub enum WorktreeError {
    /// No worktree matched the partial name or tag
    NotFound { query: String, kind: LookupKind },
    /// The user backed out of a prompt
    Cancelled,
    BranchExists { branch: String },
    BranchNotFound { branch: String, remote: String },
    /// Something other than this repository's worktree occupies the target path.
    /// `owner` names the repository when it is another one's live worktree.
    FolderCollision { path: PathBuf, owner: Option<String> },
    DirtyWorktree { path: PathBuf },
    NoBaseBranch { candidates: Vec<String>, remote: String },
    FetchFailed { remote: String, branch: String, error: String },
    StashFailed { error: String },
    /// Both rebase and merge failed; the tree is left conflicted
    SyncConflict {
        branch: String,
        source: String,
        stash: Option<String>,
    },
    /// Git failed mid-sync for a reason other than conflicts
    SyncInterrupted {
        branch: String,
        source: String,
        error: String,
        stash: Option<String>,
    },
    /// `git worktree remove` refused; the directory was left in place
    RegistrationRemovalFailed { path: PathBuf, error: String },
    NoCommitBefore { branch: String, date: String },
    DetachedHead { path: PathBuf },
    PushFailed { error: String },
    CommitFailed { error: String },
    /// The directory is not inside a git checkout
    NotAWorktree { path: PathBuf },
}

fn with_details(header: String, details: &str) -> String {
    let trimmed = details.trim();
    if trimmed.is_empty() {
        header
    } else {
        format!("{header}\n{}", format_with_gutter(trimmed))
    }
}

/// Tell the user where their local changes went.
fn write_stash_hint(f: &mut fmt::Formatter<'_>, stash: Option<&str>) -> fmt::Result {
    match stash {
        Some(label) => write!(
            f,
            "\n{}",
            hint_message(cformat!(
                "Your changes are still stashed as <bold>{label}</>; run 'git stash pop' afterwards"
            ))
        ),
        None => Ok(()),
    }
}

impl fmt::Display for WorktreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorktreeError::NotFound { query, kind } => {
                let (header, hint) = match kind {
                    LookupKind::Branch => (
                        cformat!("No worktree matches <bold>{query}</>"),
                        "Run 'wk list' to see available worktrees",
                    ),
                    LookupKind::Tag => (
                        cformat!("No worktree is tagged <bold>{query}</>"),
                        "Add one with 'wk tag add <partial> <tag>'",
                    ),
                };
                write!(f, "{}\n{}", error_message(header), hint_message(hint))
            }
            WorktreeError::Cancelled => write!(f, "{}", error_message("Cancelled")),
            WorktreeError::BranchExists { branch } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Branch <bold>{branch}</> already exists")),
                hint_message(cformat!("Use 'wk checkout {branch}' to check it out"))
            ),
            WorktreeError::BranchNotFound { branch, remote } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "Branch <bold>{branch}</> exists neither locally nor on {remote}"
                )),
                hint_message(cformat!("Use 'wk create {branch}' to start it"))
            ),
            WorktreeError::FolderCollision { path, owner: None } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{}</> exists and is not a worktree",
                    format_path_for_display(path)
                )),
                hint_message("Use --force to replace it")
            ),
            WorktreeError::FolderCollision {
                path,
                owner: Some(owner),
            } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{}</> is a worktree of <bold>{owner}</>",
                    format_path_for_display(path)
                )),
                hint_message("Delete it from that repository first, or pick another branch name")
            ),
            WorktreeError::DirtyWorktree { path } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{}</> has uncommitted changes",
                    format_path_for_display(path)
                )),
                hint_message("Commit or stash them, or use --force to discard them")
            ),
            WorktreeError::NoBaseBranch { candidates, remote } => {
                let names = candidates.join(", ");
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "No base branch to sync from (tried {names} on {remote} and locally)"
                    )),
                    hint_message("Set base-branches in the config file")
                )
            }
            WorktreeError::FetchFailed {
                remote,
                branch,
                error,
            } => {
                let header = error_message(cformat!("Failed to fetch <bold>{remote}/{branch}</>"));
                write!(f, "{}", with_details(header.to_string(), error))?;
                write!(f, "\n{}", hint_message("Nothing was changed"))
            }
            WorktreeError::StashFailed { error } => {
                let header = error_message("Failed to stash local changes");
                write!(f, "{}", with_details(header.to_string(), error))?;
                write!(f, "\n{}", hint_message("Nothing was changed"))
            }
            WorktreeError::SyncConflict {
                branch,
                source,
                stash,
            } => {
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Could not rebase or merge <bold>{source}</> into <bold>{branch}</>"
                    )),
                    hint_message("Resolve the conflicts and commit the merge")
                )?;
                write_stash_hint(f, stash.as_deref())
            }
            WorktreeError::SyncInterrupted {
                branch,
                source,
                error,
                stash,
            } => {
                let header = error_message(cformat!(
                    "Sync of <bold>{branch}</> onto <bold>{source}</> stopped"
                ));
                write!(f, "{}", with_details(header.to_string(), error))?;
                write_stash_hint(f, stash.as_deref())
            }
            WorktreeError::RegistrationRemovalFailed { path, error } => {
                let header = error_message(cformat!(
                    "Failed to unregister <bold>{}</>",
                    format_path_for_display(path)
                ));
                write!(f, "{}", with_details(header.to_string(), error))?;
                write!(f, "\n{}", hint_message("The directory was left untouched"))
            }
            WorktreeError::NoCommitBefore { branch, date } => write!(
                f,
                "{}",
                error_message(cformat!("<bold>{branch}</> has no commit on or before {date}"))
            ),
            WorktreeError::DetachedHead { path } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{}</> is not on a branch (detached HEAD)",
                    format_path_for_display(path)
                )),
                hint_message("Check out a branch before pushing")
            ),
            WorktreeError::PushFailed { error } => {
                let header = error_message("Push failed");
                write!(f, "{}", with_details(header.to_string(), error))
            }
            WorktreeError::CommitFailed { error } => {
                let header = error_message("Commit failed");
                write!(f, "{}", with_details(header.to_string(), error))
            }
            WorktreeError::NotAWorktree { path } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "<bold>{}</> is not inside a git worktree",
                    format_path_for_display(path)
                )),
                hint_message("Run this from a worktree, or pass a partial name")
            ),
        }
    }
}

impl std::error::Error for WorktreeError {}

/// Recover the semantic kind from an `anyhow::Error`, if it carries one.
pub fn worktree_error(err: &anyhow::Error) -> Option<&WorktreeError> {
    err.downcast_ref::<WorktreeError>()
}
