// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers backup, pre-deploy hook and strategy step failures.

use crate::backup::BackupError;
use crate::exec::ExecError;
use std::fmt;

/// Step of the strategy body that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    Pull,
    Build,
    Start,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            DeployStep::Pull => "pull",
            DeployStep::Build => "build",
            DeployStep::Start => "start",
        };
        f.write_str(step)
    }
}

/// Errors that end a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The pre-deploy backup could not be created.
    #[error("pre-deploy backup failed: {0}")]
    Backup(#[from] BackupError),

    /// A pre-deploy hook failed.
    #[error("pre-deploy hook `{command}` failed")]
    PreDeployHook { command: String, output: String },

    /// A strategy step failed.
    #[error("{step} failed: {source}")]
    Step {
        step: DeployStep,
        #[source]
        source: ExecError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Backup,
    Hook,
    Step,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Backup(_) => DeployErrorKind::Backup,
            DeployError::PreDeployHook { .. } => DeployErrorKind::Hook,
            DeployError::Step { .. } => DeployErrorKind::Step,
        }
    }
}
