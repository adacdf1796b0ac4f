//! Per-worktree tags, stored one per line in a `.wt-tags` sidecar.
//!
//! There is no removal operation; edit the file to drop a tag.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, bail};

use super::Worktree;
use super::index::WorktreeIndex;

pub const TAG_FILE: &str = ".wt-tags";

/// Tags in the sidecar of the worktree at `path`; empty if there is none.
pub fn read_tags(path: &Path) -> anyhow::Result<BTreeSet<String>> {
    let file = path.join(TAG_FILE);
    match std::fs::read_to_string(&file) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", file.display())),
    }
}

/// Add `tag`, rewriting the sidecar sorted and deduplicated.
///
/// Returns `false` when the tag was already there (the file is still
/// normalized).
pub fn add_tag(path: &Path, tag: &str) -> anyhow::Result<bool> {
    let tag = tag.trim();
    if tag.is_empty() {
        bail!("Tag must not be empty");
    }
    if tag.contains(['\n', '\r']) {
        bail!("Tag must be a single line");
    }

    let mut tags = read_tags(path)?;
    let added = tags.insert(tag.to_string());

    let mut content = tags.into_iter().collect::<Vec<_>>().join("\n");
    content.push('\n');
    let file = path.join(TAG_FILE);
    std::fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;
    Ok(added)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `tag` occurs in the sidecar as a whole word.
///
/// The check works on the raw file text, so `ui` matches a stored `ui-kit`
/// (the hyphen is a boundary) but never `uix`.
pub fn has_tag(path: &Path, tag: &str) -> anyhow::Result<bool> {
    if tag.is_empty() {
        return Ok(false);
    }
    let file = path.join(TAG_FILE);
    let content = match std::fs::read_to_string(&file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", file.display())),
    };

    Ok(content.match_indices(tag).any(|(start, _)| {
        let before = content[..start].chars().next_back();
        let after = content[start + tag.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }))
}

/// Worktrees under the root carrying `tag`, in index order.
pub fn list_tagged_worktrees(index: &WorktreeIndex<'_>, tag: &str) -> anyhow::Result<Vec<Worktree>> {
    let mut tagged = Vec::new();
    for worktree in index.list_worktrees()? {
        if has_tag(&worktree.path, tag)? {
            tagged.push(worktree);
        }
    }
    Ok(tagged)
}
