//! Partial-name navigation, tagging and syncing for a directory of git worktrees.

pub mod config;
pub mod git;
pub mod path;
pub mod prompt;
pub mod shell_exec;
pub mod styling;
pub mod utils;
pub mod worktree;

pub use config::Config;
pub use git::{Repository, WorktreeError};
pub use worktree::{Worktree, WorktreeIndex};
