//! Partial-name matching.

use super::Worktree;

/// Worktrees whose branch contains `partial`, in index order.
///
/// Case-sensitive substring test. Callers reject an empty `partial` first.
pub fn find_matches<'w>(worktrees: &'w [Worktree], partial: &str) -> Vec<&'w Worktree> {
    worktrees
        .iter()
        .filter(|wt| wt.branch.contains(partial))
        .collect()
}

/// Looser test used by `list`: branch, project name or path.
pub fn matches_filter(worktree: &Worktree, pattern: &str) -> bool {
    worktree.branch.contains(pattern)
        || worktree
            .project
            .as_deref()
            .is_some_and(|p| p.contains(pattern))
        || worktree.path.to_string_lossy().contains(pattern)
}
