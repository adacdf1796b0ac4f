//! Handlers that create, open, delete or time-travel a single worktree.

use chrono::NaiveDate;
use color_print::cformat;
use wtkit::path::format_path_for_display;
use wtkit::prompt::Prompt;
use wtkit::styling::{eprintln, info_message, success_message, warning_message};
use wtkit::utils::format_size;
use wtkit::worktree::{
    CheckoutOutcome, CreateOptions, DeleteOutcome, DeleteReport, Lifecycle, UpstreamStatus,
    WorktreeIndex, resolve,
};

use super::CommandContext;
use crate::output;

pub fn handle_create(
    ctx: &CommandContext,
    branch: &str,
    options: &CreateOptions,
) -> anyhow::Result<()> {
    let repo = ctx.repo()?;
    let (worktree, report) = Lifecycle::new(&ctx.config).create(&repo, branch, options)?;

    if !report.copied.is_empty() {
        log::debug!("Copied {:?}", report.copied);
    }
    output::warn_unmatched(&report.unmatched);
    eprintln!(
        "{}",
        success_message(cformat!(
            "Created branch <bold>{branch}</> in {}",
            format_path_for_display(&worktree.path)
        ))
    );
    output::enter(&ctx.config, &worktree.path)
}

pub fn handle_checkout(ctx: &CommandContext, branch: &str, force: bool) -> anyhow::Result<()> {
    let repo = ctx.repo()?;
    let outcome = Lifecycle::new(&ctx.config).checkout(&repo, branch, force)?;
    let path = format_path_for_display(&outcome.worktree().path);

    let message = match &outcome {
        CheckoutOutcome::Switched(_) => {
            info_message(cformat!("<bold>{branch}</> is already checked out in {path}"))
        }
        CheckoutOutcome::Attached(_) => {
            success_message(cformat!("Checked out <bold>{branch}</> in {path}"))
        }
        CheckoutOutcome::Tracking { remote_ref, .. } => success_message(cformat!(
            "Checked out <bold>{branch}</> tracking <bold>{remote_ref}</> in {path}"
        )),
    };
    eprintln!("{message}");
    output::enter(&ctx.config, &outcome.worktree().path)
}

pub fn handle_switch(
    ctx: &CommandContext,
    partial: &str,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    let worktree = resolve(&WorktreeIndex::new(&ctx.config), partial, prompt)?;
    log::debug!("{partial:?} resolved to {}", worktree.path.display());
    output::enter(&ctx.config, &worktree.path)
}

pub fn handle_delete(
    ctx: &CommandContext,
    partial: &str,
    force: bool,
    dry_run: bool,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    match Lifecycle::new(&ctx.config).delete(partial, force, dry_run, prompt)? {
        DeleteOutcome::DryRun(report) => {
            for line in dry_run_report(&report) {
                eprintln!("{line}");
            }
        }
        DeleteOutcome::Removed(worktree) => eprintln!(
            "{}",
            success_message(cformat!(
                "Deleted <bold>{}</> ({})",
                worktree.branch,
                format_path_for_display(&worktree.path)
            ))
        ),
    }
    Ok(())
}

/// What `delete --dry-run` tells the user, one message per line.
pub fn dry_run_report(report: &DeleteReport) -> Vec<String> {
    let worktree = &report.worktree;
    let mut lines = vec![
        info_message(cformat!(
            "Would delete <bold>{}</> at {} ({})",
            worktree.branch,
            format_path_for_display(&worktree.path),
            format_size(report.disk_usage)
        ))
        .to_string(),
    ];
    if report.dirty {
        lines.push(warning_message("Uncommitted changes would be lost").to_string());
    }
    match &report.upstream {
        UpstreamStatus::NoUpstream if worktree.detached => {}
        UpstreamStatus::NoUpstream => lines.push(
            warning_message(cformat!(
                "<bold>{}</> has no upstream; its commits exist only locally",
                worktree.branch
            ))
            .to_string(),
        ),
        UpstreamStatus::Tracking { upstream, ahead } if *ahead > 0 => lines.push(
            warning_message(cformat!(
                "{ahead} commit(s) not pushed to <bold>{upstream}</>"
            ))
            .to_string(),
        ),
        UpstreamStatus::Tracking { .. } => {}
    }
    lines
}

pub fn handle_time_travel(
    ctx: &CommandContext,
    branch: &str,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let repo = ctx.repo()?;
    let (worktree, created) = Lifecycle::new(&ctx.config).time_travel(&repo, branch, date)?;
    let path = format_path_for_display(&worktree.path);
    let message = if created {
        success_message(cformat!(
            "Checked out <bold>{branch}</> as of {date} in {path}"
        ))
    } else {
        info_message(cformat!("<bold>{branch}</> as of {date} is already in {path}"))
    };
    eprintln!("{message}");
    output::enter(&ctx.config, &worktree.path)
}
