// ABOUTME: Command executor seam for every docker / docker-compose invocation.
// ABOUTME: ShellExecutor runs `sh -c` lines and captures output; tests substitute a scripted executor.

use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;

/// Runs an assembled shell command line to completion.
///
/// Implementations return the combined stdout/stderr text on a zero exit
/// status. A successful command that printed nothing yields an empty string,
/// which is still a success.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, command: &str, env: &HashMap<String, String>) -> Result<String, ExecError>;

    /// Run with output streamed straight to the terminal, e.g. `logs -f`.
    async fn run_attached(
        &self,
        command: &str,
        env: &HashMap<String, String>,
    ) -> Result<(), ExecError> {
        self.run(command, env).await.map(|_| ())
    }
}

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {}{}", exit_code(.code), output_suffix(.output))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

fn output_suffix(output: &str) -> String {
    match output.trim() {
        "" => String::new(),
        text => format!(": {text}"),
    }
}

impl ExecError {
    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            ExecError::Spawn { command, .. } | ExecError::Failed { command, .. } => command,
        }
    }

    /// Captured output of a command that ran but failed.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecError::Failed { output, .. } => Some(output),
            ExecError::Spawn { .. } => None,
        }
    }
}

/// Executes commands through `sh -c`, inheriting the process environment.
#[derive(Debug, Clone, Copy)]
pub struct ShellExecutor {
    echo: bool,
}

impl ShellExecutor {
    /// `echo` prints each command line to stdout before running it, and the
    /// captured output once it finishes.
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn run(&self, command: &str, env: &HashMap<String, String>) -> Result<String, ExecError> {
        tracing::debug!(command, extra_env = env.len(), "executing");
        if self.echo {
            println!("Executing: {command}");
        }

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| {
                tracing::error!("failed to spawn `{}`: {}", command, source);
                ExecError::Spawn {
                    command: command.to_string(),
                    source,
                }
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if self.echo && !text.trim().is_empty() {
            println!("{}", text.trim_end());
        }

        if output.status.success() {
            Ok(text)
        } else {
            tracing::warn!(
                "`{}` failed with exit code {:?}: {}",
                command,
                output.status.code(),
                text.trim()
            );
            Err(ExecError::Failed {
                command: command.to_string(),
                code: output.status.code(),
                output: text,
            })
        }
    }

    async fn run_attached(
        &self,
        command: &str,
        env: &HashMap<String, String>,
    ) -> Result<(), ExecError> {
        tracing::debug!(command, "executing attached");
        if self.echo {
            println!("Executing: {command}");
        }

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .envs(env)
            .status()
            .await
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Failed {
                command: command.to_string(),
                code: status.code(),
                output: String::new(),
            })
        }
    }
}
