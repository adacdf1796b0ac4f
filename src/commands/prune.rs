use color_print::cformat;
use wtkit::path::format_path_for_display;
use wtkit::styling::{eprintln, info_message, success_message};
use wtkit::worktree::Lifecycle;

use super::CommandContext;

pub fn handle_prune(ctx: &CommandContext) -> anyhow::Result<()> {
    // Outside a checkout there are only stale folders to clean up
    let repo = ctx.repo().ok();
    if repo.is_none() {
        log::debug!("Not in a repository; skipping git worktree prune");
    }

    let removed = Lifecycle::new(&ctx.config).prune(repo.as_ref())?;
    if removed.is_empty() {
        eprintln!("{}", info_message("No stale worktree folders"));
    }
    for path in &removed {
        eprintln!(
            "{}",
            success_message(cformat!(
                "Removed stale folder <bold>{}</>",
                format_path_for_display(path)
            ))
        );
    }
    Ok(())
}
