use color_print::cformat;
use unicode_width::UnicodeWidthStr;
use wtkit::path::format_path_for_display;
use wtkit::styling::{
    BRANCH, DIM, DIRTY, StyledLine, TAGS, eprintln, info_message, println,
};
use wtkit::worktree::{Worktree, WorktreeIndex, matches_filter};

use super::CommandContext;

/// One rendered worktree.
#[derive(Debug, Clone)]
pub struct Row {
    pub branch: String,
    pub detached: bool,
    pub project: String,
    pub path: String,
    pub dirty: bool,
    pub tags: Vec<String>,
}

impl Row {
    fn from_worktree(worktree: &Worktree) -> anyhow::Result<Self> {
        Ok(Self {
            branch: worktree.branch.clone(),
            detached: worktree.detached,
            project: worktree.project.clone().unwrap_or_default(),
            path: format_path_for_display(&worktree.path),
            dirty: worktree.is_dirty()?,
            tags: worktree.tags()?.into_iter().collect(),
        })
    }

    fn branch_label(&self) -> String {
        if self.detached {
            format!("({})", self.branch)
        } else {
            self.branch.clone()
        }
    }
}

/// Align rows into columns: branch, project, path, dirty marker, tags.
pub fn render_rows(rows: &[Row]) -> Vec<StyledLine> {
    let branch_width = rows.iter().map(|r| r.branch_label().width()).max().unwrap_or(0);
    let project_width = rows.iter().map(|r| r.project.width()).max().unwrap_or(0);
    let path_width = rows.iter().map(|r| r.path.width()).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let mut line = StyledLine::new();
            line.push_styled(row.branch_label(), BRANCH);
            line.pad_to(branch_width + 2);
            if project_width > 0 {
                line.push_styled(&row.project, DIM);
                line.pad_to(branch_width + 2 + project_width + 2);
            }
            let before_path = line.width();
            line.push_raw(&row.path);
            if row.dirty || !row.tags.is_empty() {
                line.pad_to(before_path + path_width);
                if row.dirty {
                    line.push_styled(" *", DIRTY);
                } else {
                    line.push_raw("  ");
                }
            }
            if !row.tags.is_empty() {
                line.push_raw(" ");
                line.push_styled(format!("[{}]", row.tags.join(", ")), TAGS);
            }
            line
        })
        .collect()
}

pub fn handle_list(
    ctx: &CommandContext,
    pattern: Option<&str>,
    project_only: bool,
) -> anyhow::Result<()> {
    let index = WorktreeIndex::new(&ctx.config);
    let mut worktrees = index.list_worktrees()?;

    if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
        worktrees.retain(|w| matches_filter(w, pattern));
    }
    if project_only {
        let common_dir = ctx.repo()?.git_common_dir()?;
        worktrees.retain(|w| w.belongs_to(&common_dir));
    }

    if worktrees.is_empty() {
        eprintln!(
            "{}",
            info_message(cformat!(
                "No worktrees under <bold>{}</>",
                format_path_for_display(index.root())
            ))
        );
        return Ok(());
    }

    let rows = worktrees
        .iter()
        .map(Row::from_worktree)
        .collect::<anyhow::Result<Vec<_>>>()?;
    for line in render_rows(&rows) {
        println!("{}", line.render());
    }
    Ok(())
}
