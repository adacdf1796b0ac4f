//! `sync` and `push`: moving commits between a worktree and its remote.

use color_print::cformat;
use wtkit::git::WorktreeError;
use wtkit::path::format_path_for_display;
use wtkit::prompt::Prompt;
use wtkit::styling::{eprintln, format_with_gutter, hint_message, success_message, warning_message};
use wtkit::worktree::{StashState, SyncEngine, SyncOutcome};

use super::CommandContext;

pub fn handle_sync(
    ctx: &CommandContext,
    partial: Option<&str>,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let outcome = SyncEngine::new(&ctx.config).sync(partial, &ctx.cwd, prompt)?;
    for line in sync_report(&outcome) {
        eprintln!("{line}");
    }
    Ok(())
}

/// Summary of a finished sync, one message per line.
pub fn sync_report(outcome: &SyncOutcome) -> Vec<String> {
    let mut lines = vec![
        success_message(cformat!(
            "Synced <bold>{}</> onto <bold>{}</> ({})",
            outcome.worktree.branch,
            outcome.source,
            outcome.strategy
        ))
        .to_string(),
    ];
    match &outcome.stash {
        StashState::NotNeeded => {}
        StashState::Restored { label } => {
            log::debug!("Restored stash {label:?}");
        }
        StashState::Kept { label, error } => {
            lines.push(
                warning_message(cformat!(
                    "Local changes could not be reapplied; they are kept in stash <bold>{label}</>"
                ))
                .to_string(),
            );
            lines.push(format_with_gutter(error));
            lines.push(
                hint_message(cformat!(
                    "Resolve in {} with 'git stash pop'",
                    format_path_for_display(&outcome.worktree.path)
                ))
                .to_string(),
            );
        }
    }
    lines
}

/// Commit everything (asking for a message) and push the current branch.
pub fn handle_push(ctx: &CommandContext, prompt: &mut dyn Prompt) -> anyhow::Result<()> {
    let repo = ctx.repo()?;
    let branch = repo
        .current_branch()?
        .ok_or_else(|| WorktreeError::DetachedHead {
            path: repo.path().to_path_buf(),
        })?;

    if repo.is_dirty()? {
        let message = prompt
            .input(&cformat!("Commit message for <bold>{branch}</>"))?
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or(WorktreeError::Cancelled)?;
        if let Err(e) = repo.commit_all(&message) {
            return Err(WorktreeError::CommitFailed {
                error: format!("{e:#}"),
            }
            .into());
        }
        log::debug!("Committed all changes on {branch}");
    }

    let remote = &ctx.config.remote;
    let set_upstream = repo.upstream_branch(&branch)?.is_none();
    if let Err(e) = repo.push(remote, &branch, set_upstream) {
        return Err(WorktreeError::PushFailed {
            error: format!("{e:#}"),
        }
        .into());
    }

    eprintln!(
        "{}",
        success_message(cformat!("Pushed <bold>{branch}</> to <bold>{remote}</>"))
    );
    Ok(())
}
