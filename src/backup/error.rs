// ABOUTME: Backup and rollback error types with SNAFU context selectors.
// ABOUTME: Every filesystem failure names the path it was working on.

use snafu::Snafu;
use std::path::PathBuf;

use crate::exec::ExecError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BackupError {
    #[snafu(display("backup is not enabled"))]
    Disabled,

    #[snafu(display("failed to create backup directory {}: {source}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to copy {} to {}: {source}", from.display(), to.display()))]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to remove {}: {source}", path.display()))]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to encode backup metadata: {source}"))]
    Metadata { source: serde_json::Error },

    #[snafu(display("failed to set aside {}: {source}", path.display()))]
    SetAside {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("backup contains an env file but the environment has no env_file configured"))]
    NoEnvFileTarget,

    #[snafu(display("invalid backup path: {}", path.display()))]
    InvalidPath { path: PathBuf },

    #[snafu(display("failed to restart services after rollback: {source}"))]
    Restart { source: ExecError },
}
