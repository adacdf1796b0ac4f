//! Narrowing a partial name (or a tag) down to exactly one worktree.

use anyhow::bail;
use color_print::cformat;
use unicode_width::UnicodeWidthStr;

use super::index::WorktreeIndex;
use super::matcher::find_matches;
use super::{Worktree, tags};
use crate::git::{LookupKind, WorktreeError};
use crate::path::format_path_for_display;
use crate::prompt::Prompt;

/// Pick one of `candidates`.
///
/// None is `NotFound`, one is returned without asking, several are offered as
/// a numbered list and a declined prompt is `Cancelled`.
pub fn disambiguate(
    candidates: Vec<&Worktree>,
    query: &str,
    kind: LookupKind,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<Worktree> {
    match candidates.as_slice() {
        [] => Err(WorktreeError::NotFound {
            query: query.to_string(),
            kind,
        }
        .into()),
        [only] => Ok((*only).clone()),
        many => {
            let width = many.iter().map(|w| w.branch.width()).max().unwrap_or(0);
            let options: Vec<String> = many
                .iter()
                .map(|w| {
                    let branch = &w.branch;
                    let pad = " ".repeat(width - branch.width());
                    let path = format_path_for_display(&w.path);
                    cformat!("{branch}{pad}  <dim>{path}</>")
                })
                .collect();
            let header = match kind {
                LookupKind::Branch => cformat!("Multiple worktrees match <bold>{query}</>:"),
                LookupKind::Tag => cformat!("Multiple worktrees are tagged <bold>{query}</>:"),
            };

            match prompt.choose(&header, &options)? {
                Some(i) => Ok(many[i].clone()),
                None => Err(WorktreeError::Cancelled.into()),
            }
        }
    }
}

/// Resolve a partial branch name against the index.
pub fn resolve(
    index: &WorktreeIndex<'_>,
    partial: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<Worktree> {
    if partial.is_empty() {
        bail!("A partial branch name is required");
    }
    let worktrees = index.list_worktrees()?;
    let candidates = find_matches(&worktrees, partial);
    log::debug!("{} worktree(s) match {partial:?}", candidates.len());
    disambiguate(candidates, partial, LookupKind::Branch, prompt)
}

/// Resolve a tag to the one worktree carrying it.
pub fn resolve_tag(
    index: &WorktreeIndex<'_>,
    tag: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<Worktree> {
    let tag = tag.trim();
    if tag.is_empty() {
        bail!("A tag is required");
    }
    let tagged = tags::list_tagged_worktrees(index, tag)?;
    disambiguate(tagged.iter().collect(), tag, LookupKind::Tag, prompt)
}
