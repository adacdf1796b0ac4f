//! The hand-off boundary: what happens once a command has resolved a path.
//!
//! Messages go to stderr; stdout carries only the resolved path, so that a
//! shell wrapper can `cd "$(wk switch foo)"`.

use std::path::Path;

use anyhow::Context;
use color_print::cformat;
use wtkit::config::{Config, EnterMode};
use wtkit::path::format_path_for_display;
use wtkit::shell_exec::Cmd;
use wtkit::styling::{eprintln, info_message, println, warning_message};

/// Enter `path` the way the config asks.
pub fn enter(config: &Config, path: &Path) -> anyhow::Result<()> {
    match config.on_enter {
        EnterMode::Print => {
            println!("{}", path.display());
            Ok(())
        }
        EnterMode::Shell => spawn_shell(path),
    }
}

fn spawn_shell(path: &Path) -> anyhow::Result<()> {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    eprintln!(
        "{}",
        info_message(cformat!(
            "Starting {shell} in <bold>{}</>; exit to return",
            format_path_for_display(path)
        ))
    );
    let status = Cmd::new(&shell)
        .current_dir(path)
        .run_interactive()
        .with_context(|| format!("Failed to start {shell}"))?;
    log::debug!("{shell} exited with {status}");
    Ok(())
}

/// Warn about each copy pattern that matched nothing.
pub fn warn_unmatched(patterns: &[String]) {
    for pattern in patterns {
        eprintln!(
            "{}",
            warning_message(cformat!("Copy pattern <bold>{pattern}</> matched nothing"))
        );
    }
}
