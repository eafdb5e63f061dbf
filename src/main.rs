// ABOUTME: Entry point for the dcm CLI application.
// ABOUTME: Parses arguments and dispatches to command handlers or the interactive menu.

mod cli;
mod commands;
mod menu;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::Action;
use dcm::compose::ComposeManager;
use dcm::config;
use dcm::error::Result;
use dcm::exec::ShellExecutor;
use dcm::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            unknown_command(&e);
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);
    if matches!(cli.command, Some(Commands::Deploy { .. })) {
        output.start_timer();
    }

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let command = match cli.command {
        Some(Commands::Init { project, force }) => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, project.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            return Ok(());
        }
        other => other,
    };

    let executor = ShellExecutor::new(output.mode() == OutputMode::Normal);
    let mut manager = ComposeManager::from_path(&cli.config, cli.env.as_deref(), executor)?;

    match command.and_then(Action::from_command) {
        Some(action) => commands::execute(action, &mut manager, output).await,
        None => menu::run(&mut manager, output).await,
    }
}

fn unknown_command(err: &clap::Error) {
    let name = match err.get(ContextKind::InvalidSubcommand) {
        Some(ContextValue::String(name)) => name.as_str(),
        _ => "",
    };
    let mut cmd = Cli::command();
    let available: Vec<&str> = cmd
        .get_subcommands()
        .map(|c| c.get_name())
        .filter(|name| *name != "help")
        .collect();

    eprintln!("Unknown command: {name}");
    eprintln!("Available commands: {}", available.join(", "));
    eprintln!("{}", cmd.render_usage());
}
