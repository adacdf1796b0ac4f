mod cli;
mod commands;
mod output;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use color_print::cformat;
use wtkit::config::Config;
use wtkit::git::worktree_error;
use wtkit::path::canonicalize_best_effort;
use wtkit::prompt::TerminalPrompt;
use wtkit::styling::{eprintln, error_message};
use wtkit::worktree::CreateOptions;

use cli::{Cli, Command, TagCommand};
use commands::CommandContext;
use commands::list::handle_list;
use commands::prune::handle_prune;
use commands::shell_init::handle_shell_init;
use commands::sync::{handle_push, handle_sync};
use commands::tag::{handle_tag_add, handle_tag_show, handle_tag_switch};
use commands::worktree::{
    handle_checkout, handle_create, handle_delete, handle_switch, handle_time_travel,
};

fn init_logging(verbose: bool) {
    // --verbose takes precedence over RUST_LOG
    let mut builder = if verbose {
        let mut b = env_logger::Builder::new();
        b.filter_level(log::LevelFilter::Debug);
        b
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    };

    builder
        .format(|buf, record| {
            use std::io::Write;

            let msg = record.args().to_string();
            // Commands start with $; only the command itself is bold, not the [worktree] suffix
            if let Some(rest) = msg.strip_prefix("$ ") {
                match rest.find(" [") {
                    Some(pos) => {
                        let (command, context) = rest.split_at(pos);
                        writeln!(buf, "{}", cformat!("$ <bold>{command}</>{context}"))
                    }
                    None => writeln!(buf, "{}", cformat!("$ <bold>{rest}</>")),
                }
            } else if record.level() <= log::Level::Warn {
                writeln!(buf, "{}", cformat!("<yellow>{msg}</>"))
            } else {
                writeln!(buf, "{}", cformat!("<dim>{msg}</>"))
            }
        })
        .init();
}

/// `-C` relative to the process directory.
fn working_directory(directory: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(match directory {
        Some(dir) => canonicalize_best_effort(&cwd.join(dir)),
        None => cwd,
    })
}

fn load_config(cli: &Cli, cwd: &Path) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.worktrees_root = cwd.join(root);
    }
    log::debug!("Worktrees root: {}", config.worktrees_root.display());
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Needs neither a config nor a repository
    if let Command::ShellInit { shell } = cli.command {
        return handle_shell_init(shell);
    }

    let cwd = working_directory(cli.directory.as_deref())?;
    let config = load_config(&cli, &cwd)?;
    let ctx = CommandContext::new(config, cwd);
    let mut prompt = TerminalPrompt::stdio();

    match cli.command {
        Command::List { pattern, project } => handle_list(&ctx, pattern.as_deref(), project),
        Command::Create {
            branch,
            copy,
            base,
            force,
        } => handle_create(&ctx, &branch, &CreateOptions { base, copy, force }),
        Command::Checkout { branch, force } => handle_checkout(&ctx, &branch, force),
        Command::Switch { partial } => handle_switch(&ctx, &partial, &mut prompt),
        Command::Delete {
            partial,
            force,
            dry_run,
        } => handle_delete(&ctx, &partial, force, dry_run, &mut prompt),
        Command::Tag { command } => match command {
            TagCommand::Add { partial, tag } => handle_tag_add(&ctx, &partial, &tag, &mut prompt),
            TagCommand::Switch { tag } => handle_tag_switch(&ctx, &tag, &mut prompt),
            TagCommand::Show { partial } => handle_tag_show(&ctx, &partial, &mut prompt),
        },
        Command::TimeTravel { branch, date } => handle_time_travel(&ctx, &branch, date),
        Command::Sync { partial } => handle_sync(&ctx, partial.as_deref(), &mut prompt),
        Command::Push => handle_push(&ctx, &mut prompt),
        Command::Prune => handle_prune(&ctx),
        Command::ShellInit { shell } => handle_shell_init(shell),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        // Typed errors carry their own styling and hints
        match worktree_error(&e) {
            Some(err) => eprintln!("{err}"),
            None => eprintln!("{}", error_message(format!("{e:#}"))),
        }
        process::exit(1);
    }
}
