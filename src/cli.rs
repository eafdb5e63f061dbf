// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use dcm::config::CONFIG_FILENAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcm")]
#[command(about = "Manage Docker Compose projects across environments")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Environment to operate on
    #[arg(short, long, global = true, env = "DCM_ENV")]
    pub env: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Run one command; without one an interactive menu is shown
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start services (docker-compose up -d)
    Start { service: Option<String> },

    /// Stop services
    Stop { service: Option<String> },

    /// Restart services
    Restart { service: Option<String> },

    /// Show service status
    Status,

    /// Show service logs
    Logs {
        service: Option<String>,

        /// Follow log output
        #[arg(short, long)]
        follow: bool,

        /// Number of lines to show from the end of the logs
        #[arg(long)]
        tail: Option<u32>,
    },

    /// Remove stopped service containers
    Remove { service: Option<String> },

    /// Build services with the environment's build options
    Build { service: Option<String> },

    /// Pull service images
    Pull { service: Option<String> },

    /// Switch to an environment, or list environments
    Env { name: Option<String> },

    /// Poll service status at the configured interval
    Monitor {
        /// Stop after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Check container health for one service or all of them
    Health { service: Option<String> },

    /// Backup, then pull, stop, build and start services
    Deploy {
        /// recreate, rolling or blue-green
        strategy: Option<String>,
    },

    /// Create a backup of the compose and env files
    Backup { name: Option<String> },

    /// Restore a backup and restart services
    Rollback {
        /// Backup base path, e.g. ./backups/pre_deploy
        path: PathBuf,
    },

    /// Show the loaded configuration
    Config,

    /// Initialize a new dcm.config.yml configuration file
    Init {
        /// Project name (defaults to the directory name)
        #[arg(long)]
        project: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Aggregate status report
    Report,

    /// List backups, newest first
    Backups,

    /// Delete backups older than the retention period
    Prune,

    /// Check that a backup is complete
    Verify { path: PathBuf },
}
