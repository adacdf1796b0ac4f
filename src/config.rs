//! User configuration.
//!
//! Built once in `main` and passed by reference to every component; nothing
//! below this module reads the environment.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, else `WK_CONFIG_PATH`, else `<config dir>/wk/config.toml`)
//! 3. `WK_*` environment variables (`WK_WORKTREES_ROOT`, `WK_BASE_BRANCHES=main,trunk`)
//! 4. CLI flags, applied by the caller

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use config::{Case, Environment, File, FileFormat};
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::path::expand_path;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "WK_CONFIG_PATH";

/// What to do with folders under the root that are not linked worktrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnlinkedPolicy {
    /// Log at debug level only
    #[default]
    Skip,
    /// Print a warning for each one
    Warn,
}

/// What the command layer does with a resolved worktree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnterMode {
    /// Print the path on stdout for a shell wrapper to `cd` into
    #[default]
    Print,
    /// Spawn `$SHELL` inside the worktree
    Shell,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawConfig {
    worktrees_root: String,
    remote: String,
    base_branches: Vec<String>,
    folder_separator: String,
    unlinked_folders: UnlinkedPolicy,
    copy: Vec<String>,
    on_enter: EnterMode,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            worktrees_root: "~/worktrees".to_string(),
            remote: "origin".to_string(),
            base_branches: vec!["main".to_string(), "master".to_string()],
            folder_separator: "-".to_string(),
            unlinked_folders: UnlinkedPolicy::default(),
            copy: Vec::new(),
            on_enter: EnterMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory whose immediate children are the managed worktrees.
    pub worktrees_root: PathBuf,
    pub remote: String,
    /// Sync sources, tried remote-first in this order.
    pub base_branches: Vec<String>,
    /// Replaces `/` when turning a branch name into a folder name.
    pub folder_separator: char,
    pub unlinked_folders: UnlinkedPolicy,
    /// Copy-on-create patterns applied to every `create`.
    pub copy: Vec<String>,
    pub on_enter: EnterMode,
}

impl Config {
    /// Defaults with the given root; used by tests and embedders.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let raw = RawConfig::default();
        Self {
            worktrees_root: root.into(),
            remote: raw.remote,
            base_branches: raw.base_branches,
            folder_separator: '-',
            unlinked_folders: raw.unlinked_folders,
            copy: raw.copy,
            on_enter: raw.on_enter,
        }
    }

    /// Load from the default locations and the process environment.
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(default_config_path);
        Self::load_from(path.as_deref(), None)
    }

    /// Load from `path` (missing file is fine) layered under `WK_*` variables.
    ///
    /// `env` replaces the process environment when given.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            log::debug!("Reading config from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("WK")
                .convert_case(Case::Kebab)
                .list_separator(",")
                .with_list_parse_key("base-branches")
                .with_list_parse_key("copy")
                .source(env),
        );

        let raw: RawConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .context("Failed to load config")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let mut sep_chars = raw.folder_separator.chars();
        let folder_separator = match (sep_chars.next(), sep_chars.next()) {
            (Some(c), None) if c != '/' && c != '\\' => c,
            _ => bail!(
                "folder-separator must be a single character other than a path separator, got {:?}",
                raw.folder_separator
            ),
        };
        if raw.base_branches.is_empty() {
            bail!("base-branches must name at least one branch");
        }

        Ok(Self {
            worktrees_root: expand_path(&raw.worktrees_root)?,
            remote: raw.remote,
            base_branches: raw.base_branches,
            folder_separator,
            unlinked_folders: raw.unlinked_folders,
            copy: raw.copy,
            on_enter: raw.on_enter,
        })
    }
}

/// `<platform config dir>/wk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("wk").join("config.toml"))
}
