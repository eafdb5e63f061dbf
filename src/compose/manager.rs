// ABOUTME: ComposeManager owns the loaded config, the active environment and the executor.
// ABOUTME: Every service operation renders a docker-compose command for the active environment.

use super::ComposeCommand;
use crate::config::{Config, EnvironmentConfig, environment_variables, process_vars};
use crate::error::{Error, Result};
use crate::exec::{ExecError, Executor};
use crate::status::StatusSnapshot;
use crate::types::{EnvironmentName, ServiceName};
use std::collections::HashMap;
use std::path::Path;

/// Options for `logs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Stream until interrupted instead of printing and returning.
    pub follow: bool,
    /// Only show the last N lines per service.
    pub tail: Option<u32>,
}

/// Manages the compose project of one environment at a time.
pub struct ComposeManager<E> {
    config: Config,
    environment: String,
    current: EnvironmentConfig,
    executor: E,
}

impl<E: Executor> ComposeManager<E> {
    /// Build a manager with `environment` active.
    ///
    /// Fails with `UnknownEnvironment` if the name is not configured.
    pub fn new(config: Config, environment: &str, executor: E) -> Result<Self> {
        let current = lookup(&config, environment)?.clone();
        tracing::debug!(environment, "compose manager ready");
        Ok(Self {
            config,
            environment: environment.to_string(),
            current,
            executor,
        })
    }

    /// Load the config at `path` and select `environment` (default `dev`).
    pub fn from_path(path: &Path, environment: Option<&str>, executor: E) -> Result<Self> {
        let config = Config::load(path)?;
        Self::new(config, environment.unwrap_or("dev"), executor)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn current(&self) -> &EnvironmentConfig {
        &self.current
    }

    pub fn compose_file(&self) -> &Path {
        self.current.compose_file()
    }

    pub fn env_file(&self) -> Option<&Path> {
        self.current.env_file()
    }

    pub fn build_options(&self) -> &[String] {
        &self.current.build_options
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Make `name` the active environment. An unknown name leaves the
    /// current selection untouched.
    pub fn switch_environment(&mut self, name: &str) -> Result<()> {
        let current = lookup(&self.config, name)?.clone();
        self.environment = name.to_string();
        self.current = current;
        tracing::info!("Switched to {} environment", name);
        Ok(())
    }

    /// Env-file variables of the active environment overlaid with
    /// passthrough process variables.
    pub fn environment_variables(&self) -> HashMap<String, String> {
        environment_variables(self.env_file(), process_vars())
    }

    /// Run a rendered command, injecting the environment's variables when
    /// `use_env_file` is set.
    pub async fn execute(&self, command: &str, use_env_file: bool) -> Result<String, ExecError> {
        let env = if use_env_file && self.env_file().is_some() {
            self.environment_variables()
        } else {
            HashMap::new()
        };
        self.executor.run(command, &env).await
    }

    fn compose(&self, subcommand: &'static str) -> ComposeCommand {
        ComposeCommand::new(self.compose_file(), subcommand)
    }

    pub async fn start(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Starting services in {} environment...", self.environment);
        let cmd = self.compose("up").arg("-d").service(service);
        self.execute(&cmd.to_string(), true).await
    }

    pub async fn stop(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Stopping services in {} environment...", self.environment);
        let cmd = self.compose("stop").service(service);
        self.execute(&cmd.to_string(), false).await
    }

    pub async fn restart(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Restarting services in {} environment...", self.environment);
        let cmd = self.compose("restart").service(service);
        self.execute(&cmd.to_string(), false).await
    }

    pub async fn status(&self) -> Result<String, ExecError> {
        tracing::info!(
            "Checking service status in {} environment...",
            self.environment
        );
        self.execute(&self.compose("ps").to_string(), false).await
    }

    /// Fetch logs. With `follow` the output streams to the terminal and the
    /// returned string is empty.
    pub async fn logs(
        &self,
        service: Option<&ServiceName>,
        options: LogOptions,
    ) -> Result<String, ExecError> {
        tracing::info!("Fetching logs in {} environment...", self.environment);
        let mut cmd = self.compose("logs");
        if options.follow {
            cmd = cmd.arg("-f");
        }
        if let Some(tail) = options.tail {
            cmd = cmd.arg(format!("--tail={tail}"));
        }
        let cmd = cmd.service(service).to_string();

        if options.follow {
            self.executor
                .run_attached(&cmd, &HashMap::new())
                .await
                .map(|()| String::new())
        } else {
            self.execute(&cmd, false).await
        }
    }

    pub async fn remove(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Removing services in {} environment...", self.environment);
        let cmd = self.compose("rm").arg("-f").service(service);
        self.execute(&cmd.to_string(), false).await
    }

    pub async fn build(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Building services in {} environment...", self.environment);
        let cmd = self
            .compose("build")
            .args(self.build_options().iter().cloned())
            .service(service);
        self.execute(&cmd.to_string(), false).await
    }

    pub async fn pull(&self, service: Option<&ServiceName>) -> Result<String, ExecError> {
        tracing::info!("Pulling images in {} environment...", self.environment);
        let cmd = self.compose("pull").service(service);
        self.execute(&cmd.to_string(), false).await
    }

    /// `ps --format json` parsed into a snapshot. A failing command yields a
    /// snapshot carrying the error instead of services.
    pub async fn service_status(&self) -> StatusSnapshot {
        let cmd = self.compose("ps").arg("--format").arg("json").to_string();
        match self.executor.run(&cmd, &HashMap::new()).await {
            Ok(output) => StatusSnapshot::from_output(&output),
            Err(e) => {
                tracing::warn!("Failed to get service status: {}", e);
                StatusSnapshot::failed("Failed to get service status")
            }
        }
    }
}

fn lookup<'a>(config: &'a Config, name: &str) -> Result<&'a EnvironmentConfig> {
    let unknown = || Error::UnknownEnvironment {
        name: name.to_string(),
        available: config.environment_names(),
    };
    if EnvironmentName::new(name).is_err() {
        return Err(unknown());
    }
    config.environment(name).ok_or_else(unknown)
}
