// ABOUTME: Command module aggregator for the dcm CLI.
// ABOUTME: Actions are shared by one-shot subcommands and the interactive menu.

mod backup;
mod deploy;
mod environment;
mod monitor;
mod services;

use crate::cli::Commands;
use dcm::compose::{ComposeManager, LogOptions};
use dcm::error::Result;
use dcm::exec::Executor;
use dcm::output::Output;
use dcm::types::ServiceName;
use std::path::PathBuf;
use std::time::Duration;

pub use services::ServiceOp;

/// One operation against the active environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Service(ServiceOp, Option<String>),
    Status,
    Logs(Option<String>, LogOptions),
    Env(Option<String>),
    Monitor(Option<Duration>),
    Health(Option<String>),
    Deploy(Option<String>),
    Backup(Option<String>),
    Rollback(PathBuf),
    Config,
    Report,
    Backups,
    Prune,
    Verify(PathBuf),
}

impl Action {
    /// Map a subcommand to an action. `Init` runs before any config is
    /// loaded and has no action.
    pub fn from_command(command: Commands) -> Option<Self> {
        let action = match command {
            Commands::Start { service } => Action::Service(ServiceOp::Start, service),
            Commands::Stop { service } => Action::Service(ServiceOp::Stop, service),
            Commands::Restart { service } => Action::Service(ServiceOp::Restart, service),
            Commands::Remove { service } => Action::Service(ServiceOp::Remove, service),
            Commands::Build { service } => Action::Service(ServiceOp::Build, service),
            Commands::Pull { service } => Action::Service(ServiceOp::Pull, service),
            Commands::Status => Action::Status,
            Commands::Logs {
                service,
                follow,
                tail,
            } => Action::Logs(service, LogOptions { follow, tail }),
            Commands::Env { name } => Action::Env(name),
            Commands::Monitor { duration } => Action::Monitor(duration.map(Duration::from_secs)),
            Commands::Health { service } => Action::Health(service),
            Commands::Deploy { strategy } => Action::Deploy(strategy),
            Commands::Backup { name } => Action::Backup(name),
            Commands::Rollback { path } => Action::Rollback(path),
            Commands::Config => Action::Config,
            Commands::Report => Action::Report,
            Commands::Backups => Action::Backups,
            Commands::Prune => Action::Prune,
            Commands::Verify { path } => Action::Verify(path),
            Commands::Init { .. } => return None,
        };
        Some(action)
    }
}

/// Run `action` against `manager`.
pub async fn execute<E: Executor>(
    action: Action,
    manager: &mut ComposeManager<E>,
    output: &Output,
) -> Result<()> {
    match action {
        Action::Service(op, service) => {
            services::run(manager, op, parse_service(service)?.as_ref(), output).await
        }
        Action::Status => services::status(manager, output).await,
        Action::Logs(service, options) => {
            services::logs(manager, parse_service(service)?.as_ref(), options, output).await
        }
        Action::Env(name) => environment::env(manager, name.as_deref(), output),
        Action::Config => environment::show_config(manager, output),
        Action::Monitor(duration) => monitor::monitor(manager, duration, output).await,
        Action::Health(service) => {
            monitor::health(manager, parse_service(service)?.as_ref(), output).await
        }
        Action::Report => monitor::report(manager, output).await,
        Action::Deploy(strategy) => deploy::deploy(manager, strategy.as_deref(), output).await,
        Action::Backup(name) => backup::create(manager, name.as_deref(), output).await,
        Action::Rollback(path) => backup::rollback(manager, &path, output).await,
        Action::Backups => backup::list(manager, output),
        Action::Prune => backup::prune(manager, output),
        Action::Verify(path) => backup::verify(manager, &path, output),
    }
}

fn parse_service(service: Option<String>) -> Result<Option<ServiceName>> {
    Ok(service
        .filter(|s| !s.is_empty())
        .map(|s| ServiceName::new(&s))
        .transpose()?)
}
