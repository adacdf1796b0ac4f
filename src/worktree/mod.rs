//! Worktrees under the configured root: discovery, resolution, tags,
//! lifecycle and sync.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::git::Repository;

mod copy;
mod index;
mod lifecycle;
mod matcher;
pub mod naming;
mod resolve;
mod sync;
pub mod tags;

pub use copy::{CopyReport, copy_patterns};
pub use index::{Linkage, WorktreeIndex, read_linkage};
pub use lifecycle::{
    CheckoutOutcome, CreateOptions, DeleteOutcome, DeleteReport, Lifecycle, UpstreamStatus,
};
pub use matcher::{find_matches, matches_filter};
pub use resolve::{disambiguate, resolve, resolve_tag};
pub use sync::{StashState, SyncEngine, SyncOutcome, SyncSource, SyncStrategy};

/// One linked worktree under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    /// Checked-out branch, or the folder-derived name when git reports none.
    pub branch: String,
    /// HEAD is detached (or the branch could not be read).
    pub detached: bool,
    /// Name of the parent repository, from the linkage metadata.
    pub project: Option<String>,
    /// The parent repository's shared `.git` directory.
    pub common_dir: PathBuf,
}

impl Worktree {
    pub fn repo(&self) -> Repository {
        Repository::at(&self.path)
    }

    pub fn folder_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> anyhow::Result<bool> {
        self.repo().is_dirty()
    }

    /// Upstream of the checked-out branch; always `None` when detached.
    pub fn upstream(&self) -> anyhow::Result<Option<String>> {
        if self.detached {
            return Ok(None);
        }
        self.repo().upstream_branch(&self.branch)
    }

    pub fn tags(&self) -> anyhow::Result<BTreeSet<String>> {
        tags::read_tags(&self.path)
    }

    /// Whether this worktree belongs to the repository whose common dir is `common_dir`.
    pub fn belongs_to(&self, common_dir: &Path) -> bool {
        crate::path::canonicalize_best_effort(&self.common_dir)
            == crate::path::canonicalize_best_effort(common_dir)
    }
}
