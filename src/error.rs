// ABOUTME: Application-wide error types for dcm.
// ABOUTME: Uses thiserror; kind() groups variants for callers that branch on category.

use std::path::PathBuf;
use thiserror::Error;

use crate::backup::BackupError;
use crate::deploy::DeployError;
use crate::exec::ExecError;
use crate::types::{NameError, PathError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("environment '{name}' not found. Available: {}", .available.join(", "))]
    UnknownEnvironment {
        name: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    InvalidName(#[from] NameError),

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("backup {} failed verification", .0.display())]
    InvalidBackup(PathBuf),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("monitoring failed: {0}")]
    Monitoring(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error category for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed configuration; fatal at startup.
    Config,
    /// Unknown environment name; recoverable.
    Environment,
    /// A name or path failed the shell-safety allow-list.
    Validation,
    /// An external command failed or could not be spawned.
    Execution,
    Backup,
    Deployment,
    Monitoring,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) | Error::Yaml(_) => ErrorKind::Config,
            Error::UnknownEnvironment { .. } => ErrorKind::Environment,
            Error::InvalidName(_) | Error::InvalidPath(_) => ErrorKind::Validation,
            Error::Exec(_) => ErrorKind::Execution,
            Error::Backup(_) | Error::InvalidBackup(_) => ErrorKind::Backup,
            Error::Deploy(_) => ErrorKind::Deployment,
            Error::Monitoring(_) => ErrorKind::Monitoring,
            Error::AlreadyExists(_) | Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether an interactive session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Config)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
