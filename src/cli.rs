use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "wk",
    version,
    about = "Jump between, tag and sync git worktrees by partial branch name",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Show debug output, including every git command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the worktrees (overrides worktrees-root)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Config file to read instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run as if started in PATH (like `git -C`)
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List worktrees with their branch, project, dirty state and tags
    List {
        /// Only show worktrees whose branch, project or path contains this
        pattern: Option<String>,
        /// Only show worktrees of the repository in the current directory
        #[arg(long)]
        project: bool,
    },
    /// Start a new branch in a new worktree
    Create {
        branch: String,
        /// Copy matching files from the project into the new worktree (gitignore globs)
        #[arg(long = "copy", value_name = "PATTERN")]
        copy: Vec<String>,
        /// Start point for the branch (defaults to HEAD)
        #[arg(long, value_name = "REF")]
        base: Option<String>,
        /// Pass --force to git worktree add
        #[arg(long, short)]
        force: bool,
    },
    /// Open an existing local or remote branch in its worktree
    Checkout {
        branch: String,
        /// Replace a folder that is in the way
        #[arg(long, short)]
        force: bool,
    },
    /// Go to the worktree whose branch contains PARTIAL
    Switch { partial: String },
    /// Unregister a worktree and delete its folder
    Delete {
        partial: String,
        /// Delete even with uncommitted changes
        #[arg(long, short)]
        force: bool,
        /// Only report what would be lost
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// Label worktrees and jump to them by label
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Check out a branch as it was at the end of DATE, detached
    TimeTravel {
        branch: String,
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    /// Rebase (or merge) a worktree onto the base branch, keeping local changes
    Sync {
        /// Worktree to sync; defaults to the current one after confirmation
        partial: Option<String>,
    },
    /// Commit everything (after asking for a message) and push the current branch
    Push,
    /// Remove stale folders under the root and prune git's registrations
    Prune,
    /// Print a shell function that cds into the paths wk prints
    ShellInit { shell: Shell },
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Add TAG to the worktree matching PARTIAL
    Add { partial: String, tag: String },
    /// Go to the worktree tagged TAG
    Switch { tag: String },
    /// Show the tags of the worktree matching PARTIAL
    Show { partial: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}
