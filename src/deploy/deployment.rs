// ABOUTME: Deployment orchestration: backup, pre-hooks, strategy body, post-hooks.
// ABOUTME: Failures before or during the body roll back to the pre-deploy backup when configured.

use crate::backup::BackupManager;
use crate::compose::ComposeManager;
use crate::diagnostics::{Diagnostics, Warning};
use crate::exec::{ExecError, Executor};
use crate::hooks::{HookContext, HookPoint, HookRunner};
use std::path::Path;

use super::error::{DeployError, DeployStep};
use super::strategy::DeployStrategy;

/// Name of the backup taken before every deployment.
pub const PRE_DEPLOY_BACKUP: &str = "pre_deploy";

/// What happened to the rollback after a failed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    NotAttempted,
    Succeeded,
    Failed(String),
}

/// Terminal state of a deployment.
#[derive(Debug)]
pub enum DeployOutcome {
    Deployed,
    DeployedWithWarnings(Vec<Warning>),
    Failed {
        error: DeployError,
        rollback: RollbackOutcome,
    },
}

impl DeployOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeployOutcome::Failed { .. })
    }
}

/// Runs deployments for the manager's active environment.
pub struct Deployer<'a, E> {
    manager: &'a ComposeManager<E>,
}

impl<'a, E: Executor> Deployer<'a, E> {
    pub fn new(manager: &'a ComposeManager<E>) -> Self {
        Self { manager }
    }

    /// Deploy with `strategy`, or the configured one when `None`.
    pub async fn deploy(&self, strategy: Option<&str>) -> DeployOutcome {
        let settings = &self.manager.config().deployment;
        let mut diag = Diagnostics::default();

        let (strategy, unknown) = DeployStrategy::resolve(strategy, &settings.strategy);
        if let Some(label) = unknown {
            diag.warn(Warning::unknown_strategy(&label));
        }
        tracing::info!("Starting deployment with strategy: {}", strategy);

        let backups = BackupManager::new(self.manager);
        let backup = match backups.create(Some(PRE_DEPLOY_BACKUP)).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Failed to create backup: {}", e);
                return DeployOutcome::Failed {
                    error: e.into(),
                    rollback: RollbackOutcome::NotAttempted,
                };
            }
        };

        let context = HookContext {
            environment: self.manager.environment().to_string(),
            compose_file: self.manager.compose_file().to_path_buf(),
            strategy: strategy.to_string(),
            backup: Some(backup.clone()),
        };
        let hooks = HookRunner::new(self.manager.executor(), self.manager.environment_variables());

        let result = match self.pre_deploy(&hooks, &context).await {
            Ok(()) => self.run_strategy(strategy).await,
            Err(e) => Err(e),
        };

        if let Err(error) = result {
            tracing::error!("Deployment failed: {}", error);
            let rollback = if settings.rollback_on_failure {
                self.rollback(&backups, &backup).await
            } else {
                RollbackOutcome::NotAttempted
            };
            return DeployOutcome::Failed { error, rollback };
        }

        let post = hooks
            .run(HookPoint::PostDeploy, &settings.post_deploy_hooks, &context)
            .await;
        for failed in post.iter().filter(|r| !r.success) {
            diag.warn(Warning::post_deploy_hook(format!(
                "post-deploy hook `{}` failed",
                failed.command
            )));
        }

        tracing::info!("Deployment completed successfully");
        if diag.has_warnings() {
            DeployOutcome::DeployedWithWarnings(diag.into_warnings())
        } else {
            DeployOutcome::Deployed
        }
    }

    async fn pre_deploy(
        &self,
        hooks: &HookRunner<'_, E>,
        context: &HookContext,
    ) -> Result<(), DeployError> {
        let commands = &self.manager.config().deployment.pre_deploy_hooks;
        let results = hooks.run(HookPoint::PreDeploy, commands, context).await;
        match results.into_iter().find(|r| !r.success) {
            Some(failed) => Err(DeployError::PreDeployHook {
                command: failed.command,
                output: failed.output,
            }),
            None => Ok(()),
        }
    }

    /// The body shared by every strategy.
    async fn run_strategy(&self, strategy: DeployStrategy) -> Result<(), DeployError> {
        tracing::info!("Using {} deployment strategy", strategy);
        let pulled = self.manager.pull(None).await.map_err(step_failed(DeployStep::Pull))?;
        log_step_output(DeployStep::Pull, &pulled);
        match self.manager.stop(None).await {
            Ok(stopped) => log_step_output("stop", &stopped),
            Err(e) => tracing::warn!("Stopping services failed, continuing: {}", e),
        }
        let built = self.manager.build(None).await.map_err(step_failed(DeployStep::Build))?;
        log_step_output(DeployStep::Build, &built);
        let started = self.manager.start(None).await.map_err(step_failed(DeployStep::Start))?;
        log_step_output(DeployStep::Start, &started);
        Ok(())
    }

    async fn rollback(&self, backups: &BackupManager<'_, E>, backup: &Path) -> RollbackOutcome {
        match backups.rollback(backup).await {
            Ok(()) => RollbackOutcome::Succeeded,
            Err(e) => {
                tracing::error!("Rollback failed: {}", e);
                RollbackOutcome::Failed(e.to_string())
            }
        }
    }
}

fn log_step_output(step: impl std::fmt::Display, output: &str) {
    let output = output.trim();
    if !output.is_empty() {
        tracing::info!("{} output:\n{}", step, output);
    }
}

fn step_failed(step: DeployStep) -> impl FnOnce(ExecError) -> DeployError {
    move |source| DeployError::Step { step, source }
}
