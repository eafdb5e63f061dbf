// ABOUTME: Hooks system for deployment lifecycle events.
// ABOUTME: Runs the configured pre-deploy and post-deploy shell commands through the executor.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::expand_variables;
use crate::exec::{ExecError, Executor};

/// Hook execution points in the deployment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before the strategy body. Failure aborts deployment.
    PreDeploy,
    /// After a successful deployment. Failure logs a warning.
    PostDeploy,
}

impl HookPoint {
    pub fn label(&self) -> &'static str {
        match self {
            HookPoint::PreDeploy => "pre-deploy",
            HookPoint::PostDeploy => "post-deploy",
        }
    }

    /// Whether failure at this hook point should abort deployment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookPoint::PreDeploy)
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub environment: String,
    pub compose_file: PathBuf,
    pub strategy: String,
    pub backup: Option<PathBuf>,
}

impl HookContext {
    /// Convert context to environment variables.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("DCM_ENVIRONMENT".to_string(), self.environment.clone());
        env.insert(
            "DCM_COMPOSE_FILE".to_string(),
            self.compose_file.display().to_string(),
        );
        env.insert("DCM_STRATEGY".to_string(), self.strategy.clone());
        if let Some(ref backup) = self.backup {
            env.insert("DCM_BACKUP".to_string(), backup.display().to_string());
        }
        env
    }
}

/// Result of running one hook command.
#[derive(Debug)]
pub struct HookResult {
    pub command: String,
    pub success: bool,
    pub output: String,
}

/// Runs hook commands with the deploy context in their environment.
pub struct HookRunner<'a, E> {
    executor: &'a E,
    base_env: HashMap<String, String>,
}

impl<'a, E: Executor> HookRunner<'a, E> {
    /// `base_env` holds the environment's resolved variables; the hook
    /// context is layered on top of it.
    pub fn new(executor: &'a E, base_env: HashMap<String, String>) -> Self {
        Self { executor, base_env }
    }

    /// Run `commands` in order, stopping at the first failure.
    ///
    /// Returns the results of the commands that ran; the last one is the
    /// failure if any failed.
    pub async fn run(
        &self,
        point: HookPoint,
        commands: &[String],
        context: &HookContext,
    ) -> Vec<HookResult> {
        let mut env = self.base_env.clone();
        env.extend(context.to_env());

        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            let command = expand_variables(command, &env);
            tracing::info!("Running {} hook: {}", point.label(), command);

            let result = match self.executor.run(&command, &env).await {
                Ok(output) => HookResult {
                    command,
                    success: true,
                    output,
                },
                Err(e) => {
                    if point.is_fatal() {
                        tracing::error!("{} hook failed: {}", point.label(), e);
                    } else {
                        tracing::warn!("{} hook failed: {}", point.label(), e);
                    }
                    let output = hook_error_output(&e);
                    HookResult {
                        command,
                        success: false,
                        output,
                    }
                }
            };

            let failed = !result.success;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }
}

fn hook_error_output(err: &ExecError) -> String {
    err.output()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}
