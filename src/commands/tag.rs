use color_print::cformat;
use wtkit::path::format_path_for_display;
use wtkit::prompt::Prompt;
use wtkit::styling::{eprintln, info_message, println, success_message};
use wtkit::worktree::tags::{TAG_FILE, add_tag};
use wtkit::worktree::{WorktreeIndex, resolve, resolve_tag};

use super::CommandContext;
use crate::output;

pub fn handle_tag_add(
    ctx: &CommandContext,
    partial: &str,
    tag: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let worktree = resolve(&WorktreeIndex::new(&ctx.config), partial, prompt)?;

    // Keep the sidecar out of `git status` so it never dirties the worktree
    if worktree.repo().ensure_excluded(TAG_FILE)? {
        log::debug!("Added {TAG_FILE} to info/exclude of {}", worktree.common_dir.display());
    }

    let tag = tag.trim();
    let message = if add_tag(&worktree.path, tag)? {
        success_message(cformat!("Tagged <bold>{}</> with <bold>{tag}</>", worktree.branch))
    } else {
        info_message(cformat!("<bold>{}</> is already tagged <bold>{tag}</>", worktree.branch))
    };
    eprintln!("{message}");
    Ok(())
}

pub fn handle_tag_switch(
    ctx: &CommandContext,
    tag: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let worktree = resolve_tag(&WorktreeIndex::new(&ctx.config), tag, prompt)?;
    output::enter(&ctx.config, &worktree.path)
}

/// Print one tag per line.
pub fn handle_tag_show(
    ctx: &CommandContext,
    partial: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let worktree = resolve(&WorktreeIndex::new(&ctx.config), partial, prompt)?;
    let tags = worktree.tags()?;
    if tags.is_empty() {
        eprintln!(
            "{}",
            info_message(cformat!(
                "<bold>{}</> has no tags ({})",
                worktree.branch,
                format_path_for_display(&worktree.path)
            ))
        );
    }
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}
