//! Copy-on-create: seed a new worktree with untracked files from the project.
//!
//! Patterns use gitignore glob syntax and are each expanded against the
//! project root (not the new worktree). `.git` is never matched or copied.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ignore::overrides::{Override, OverrideBuilder};

/// What a copy pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Copied entries, relative to the project root, in walk order.
    pub copied: Vec<PathBuf>,
    /// Patterns that matched nothing.
    pub unmatched: Vec<String>,
}

fn build_matcher(root: &Path, pattern: &str) -> anyhow::Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    builder
        .add(pattern)
        .with_context(|| format!("Invalid copy pattern {pattern:?}"))?;
    builder
        .build()
        .with_context(|| format!("Invalid copy pattern {pattern:?}"))
}

/// Entries under `dir` matching `matcher`. A matched directory is returned
/// whole and not descended into.
fn collect_matches(dir: &Path, matcher: &Override, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if entry.file_name() == ".git" {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if matcher.matched(&path, file_type.is_dir()).is_whitelist() {
            out.push(path);
        } else if file_type.is_dir() {
            collect_matches(&path, matcher, out)?;
        }
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_name() == ".git" {
            continue;
        }
        copy_entry(&entry.path(), &dest.join(entry.file_name()))?;
    }
    Ok(())
}

fn copy_entry(src: &Path, dest: &Path) -> anyhow::Result<()> {
    let meta = std::fs::symlink_metadata(src)?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if meta.file_type().is_symlink() {
        copy_symlink(src, dest)
    } else if meta.is_dir() {
        copy_dir_recursive(src, dest)
    } else {
        reflink_copy::reflink_or_copy(src, dest)
            .with_context(|| format!("Failed to copy {}", src.display()))?;
        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> anyhow::Result<()> {
    let target = std::fs::read_link(src)?;
    if std::fs::symlink_metadata(dest).is_ok() {
        std::fs::remove_file(dest)?;
    }
    std::os::unix::fs::symlink(&target, dest)
        .with_context(|| format!("Failed to link {}", dest.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dest: &Path) -> anyhow::Result<()> {
    log::warn!("Skipping symlink {}: not supported on this platform", src.display());
    Ok(())
}

/// Copy everything `patterns` match under `project_root` into `worktree`,
/// keeping relative paths.
pub fn copy_patterns(
    project_root: &Path,
    worktree: &Path,
    patterns: &[String],
) -> anyhow::Result<CopyReport> {
    let mut report = CopyReport::default();

    for pattern in patterns {
        let matcher = build_matcher(project_root, pattern)?;
        let mut matches = Vec::new();
        collect_matches(project_root, &matcher, &mut matches)?;

        if matches.is_empty() {
            report.unmatched.push(pattern.clone());
            continue;
        }
        for src in matches {
            let rel = src.strip_prefix(project_root)?.to_path_buf();
            if report.copied.contains(&rel) {
                continue;
            }
            log::debug!("Copying {} into {}", rel.display(), worktree.display());
            copy_entry(&src, &worktree.join(&rel))?;
            report.copied.push(rel);
        }
    }

    Ok(report)
}
