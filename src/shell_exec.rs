//! Logged execution of external commands.
//!
//! All `git` calls go through [`Cmd`] so that `-v` shows every invocation
//! with its working context, duration and exit status.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

/// Builder for a single external command.
///
/// ```ignore
/// let output = Cmd::new("git")
///     .args(["status", "--porcelain"])
///     .current_dir(&worktree_path)
///     .context("feature-login")
///     .run()?;
/// ```
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    context: Option<String>,
    envs: Vec<(String, String)>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            context: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set the logging context (typically the worktree folder name).
    pub fn context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }

    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, val) in &self.envs {
            cmd.env(key, val);
        }
        cmd
    }

    /// Run to completion, capturing stdout and stderr.
    pub fn run(self) -> std::io::Result<Output> {
        let cmd_str = self.display();
        match &self.context {
            Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
            None => log::debug!("$ {}", cmd_str),
        }

        let t0 = Instant::now();
        let result = self
            .build()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();
        let dur_ms = t0.elapsed().as_millis();

        match &result {
            Ok(output) => log::debug!(
                "[wk-trace] cmd=\"{}\" dur_ms={} ok={}",
                cmd_str,
                dur_ms,
                output.status.success()
            ),
            Err(e) => log::debug!(
                "[wk-trace] cmd=\"{}\" dur_ms={} err=\"{}\"",
                cmd_str,
                dur_ms,
                e
            ),
        }

        result
    }

    /// Run attached to the terminal and wait for it to exit.
    ///
    /// Used for the interactive shell hand-off, where output must not be captured.
    pub fn run_interactive(self) -> std::io::Result<std::process::ExitStatus> {
        log::debug!("$ {} (interactive)", self.display());
        self.build()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
    }
}
