pub mod list;
pub mod prune;
pub mod shell_init;
pub mod sync;
pub mod tag;
pub mod worktree;

use std::path::PathBuf;

use wtkit::config::Config;
use wtkit::git::{Repository, WorktreeError};

/// What every handler gets: the loaded config and where we were started.
pub struct CommandContext {
    pub config: Config,
    pub cwd: PathBuf,
}

impl CommandContext {
    pub fn new(config: Config, cwd: PathBuf) -> Self {
        Self { config, cwd }
    }

    /// The checkout containing the working directory, at its top level.
    pub fn repo(&self) -> anyhow::Result<Repository> {
        let here = Repository::at(&self.cwd);
        if !here.is_inside_work_tree() {
            return Err(WorktreeError::NotAWorktree {
                path: self.cwd.clone(),
            }
            .into());
        }
        Ok(Repository::at(here.worktree_root()?))
    }
}
