//! Discovery of the worktrees under the configured root.

use std::path::{Path, PathBuf};

use anyhow::Context;
use color_print::cformat;

use super::Worktree;
use super::naming::folder_to_branch;
use crate::config::{Config, UnlinkedPolicy};
use crate::git::Repository;
use crate::path::format_path_for_display;
use crate::styling::{eprintln, warning_message};

/// Where a linked worktree's `.git` file points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkage {
    /// `<common>/worktrees/<name>`, the per-worktree admin directory.
    pub gitdir: PathBuf,
    /// The parent repository's shared `.git` directory.
    pub common_dir: PathBuf,
}

impl Linkage {
    /// The admin directory still exists, so git knows this worktree.
    pub fn is_live(&self) -> bool {
        self.gitdir.is_dir()
    }

    /// Repository name: the folder holding `.git`, or a bare repo's name without `.git`.
    pub fn project(&self) -> Option<String> {
        let name = self.common_dir.file_name()?.to_string_lossy().into_owned();
        if name == ".git" {
            let parent = self.common_dir.parent()?.file_name()?;
            Some(parent.to_string_lossy().into_owned())
        } else {
            Some(name.strip_suffix(".git").unwrap_or(&name).to_string())
        }
    }
}

/// Parse the `gitdir:` pointer of a linked worktree.
///
/// Returns `None` for anything that is not a linked worktree: no `.git`, a
/// `.git` directory (a full clone), or an unreadable pointer file.
pub fn read_linkage(dir: &Path) -> Option<Linkage> {
    let dot_git = dir.join(".git");
    if !dot_git.is_file() {
        return None;
    }
    let content = std::fs::read_to_string(&dot_git).ok()?;
    let raw = content.lines().find_map(|l| l.strip_prefix("gitdir:"))?.trim();
    if raw.is_empty() {
        return None;
    }
    let gitdir = dir.join(raw);

    let common_dir = std::fs::read_to_string(gitdir.join("commondir"))
        .ok()
        .map(|c| gitdir.join(c.trim()))
        .or_else(|| gitdir.parent()?.parent().map(Path::to_path_buf))?;

    Some(Linkage {
        gitdir: crate::path::canonicalize_best_effort(&gitdir),
        common_dir: crate::path::canonicalize_best_effort(&common_dir),
    })
}

/// The set of worktrees under `config.worktrees_root`.
///
/// Nothing is cached: every call rescans the root and asks git for branches.
pub struct WorktreeIndex<'a> {
    config: &'a Config,
}

impl<'a> WorktreeIndex<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn root(&self) -> &Path {
        &self.config.worktrees_root
    }

    /// Immediate subdirectories of the root, by folder name. Creates the root.
    fn folders(&self) -> anyhow::Result<Vec<PathBuf>> {
        let root = self.root();
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", format_path_for_display(root)))?;

        let mut folders = Vec::new();
        for entry in std::fs::read_dir(root)
            .with_context(|| format!("Failed to read {}", format_path_for_display(root)))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.path());
            }
        }
        folders.sort();
        Ok(folders)
    }

    fn report_unlinked(&self, dir: &Path) {
        match self.config.unlinked_folders {
            UnlinkedPolicy::Skip => {
                log::debug!("Skipping {}: not a linked worktree", dir.display());
            }
            UnlinkedPolicy::Warn => eprintln!(
                "{}",
                warning_message(cformat!(
                    "Skipping <bold>{}</>: not a linked worktree",
                    format_path_for_display(dir)
                ))
            ),
        }
    }

    /// Build the entry for `dir`, which must carry live linkage.
    fn load(&self, dir: &Path, linkage: Linkage) -> anyhow::Result<Worktree> {
        let (branch, detached) = match Repository::at(dir).current_branch() {
            Ok(Some(branch)) => (branch, false),
            Ok(None) | Err(_) => {
                let folder = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (folder_to_branch(&folder, self.config.folder_separator), true)
            }
        };
        Ok(Worktree {
            path: dir.to_path_buf(),
            branch,
            detached,
            project: linkage.project(),
            common_dir: linkage.common_dir,
        })
    }

    /// Every linked worktree under the root, ordered by folder name.
    pub fn list_worktrees(&self) -> anyhow::Result<Vec<Worktree>> {
        let mut worktrees = Vec::new();
        for dir in self.folders()? {
            match read_linkage(&dir) {
                Some(linkage) if linkage.is_live() => worktrees.push(self.load(&dir, linkage)?),
                _ => self.report_unlinked(&dir),
            }
        }
        Ok(worktrees)
    }

    /// The worktree at exactly `path`, if it is a live one.
    pub fn worktree_at(&self, path: &Path) -> anyhow::Result<Option<Worktree>> {
        match read_linkage(path) {
            Some(linkage) if linkage.is_live() => Ok(Some(self.load(path, linkage)?)),
            _ => Ok(None),
        }
    }

    /// Folders whose `.git` file points at an admin directory that is gone.
    pub fn stale_folders(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self
            .folders()?
            .into_iter()
            .filter(|dir| read_linkage(dir).is_some_and(|l| !l.is_live()))
            .collect())
    }
}
