// ABOUTME: Interactive numbered menu shown when dcm runs without a subcommand.
// ABOUTME: Reads choices line by line from stdin; errors are printed and the loop continues.

use crate::commands::{self, Action, ServiceOp};
use dcm::compose::{ComposeManager, LogOptions};
use dcm::error::Result;
use dcm::exec::Executor;
use dcm::output::Output;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const SEPARATOR_WIDTH: usize = 50;

/// Line-oriented prompt over stdin.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask `question` and return the trimmed answer, or `None` on EOF.
    async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{question}");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Ask for an optional value; blank means none.
    async fn ask_optional(&mut self, question: &str) -> Result<Option<String>> {
        Ok(self.ask(question).await?.filter(|answer| !answer.is_empty()))
    }
}

pub async fn run<E: Executor>(manager: &mut ComposeManager<E>, output: &Output) -> Result<()> {
    let mut prompt = Prompt::new();

    loop {
        display_menu(manager);
        let Some(choice) = prompt.ask("Select option: ").await? else {
            break;
        };

        let action = match choice.as_str() {
            "0" => break,
            "1" => service_action(&mut prompt, ServiceOp::Start).await?,
            "2" => service_action(&mut prompt, ServiceOp::Stop).await?,
            "3" => service_action(&mut prompt, ServiceOp::Restart).await?,
            "4" => Action::Status,
            "5" => {
                let service = prompt
                    .ask_optional("Service name (blank for all): ")
                    .await?;
                let follow = prompt
                    .ask("Follow logs? (y/N): ")
                    .await?
                    .is_some_and(|a| a.eq_ignore_ascii_case("y"));
                Action::Logs(service, LogOptions { follow, tail: None })
            }
            "6" => service_action(&mut prompt, ServiceOp::Remove).await?,
            "7" => service_action(&mut prompt, ServiceOp::Build).await?,
            "8" => service_action(&mut prompt, ServiceOp::Pull).await?,
            "9" => {
                let names = manager.config().environment_names().join(", ");
                println!("Available environments: {names}");
                match prompt.ask_optional("Environment: ").await? {
                    Some(name) => Action::Env(Some(name)),
                    None => continue,
                }
            }
            "10" => {
                let answer = prompt
                    .ask_optional("Duration in seconds (blank to run until Ctrl+C): ")
                    .await?;
                match answer.map(|a| a.parse::<u64>()).transpose() {
                    Ok(duration) => Action::Monitor(duration.map(Duration::from_secs)),
                    Err(_) => {
                        output.error("Duration must be a whole number of seconds");
                        continue;
                    }
                }
            }
            "11" => Action::Health(
                prompt
                    .ask_optional("Service name (blank for all): ")
                    .await?,
            ),
            "12" => Action::Deploy(
                prompt
                    .ask_optional("Strategy (recreate/rolling/blue-green, blank for configured): ")
                    .await?,
            ),
            "13" => Action::Backup(
                prompt
                    .ask_optional("Backup name (blank for timestamp): ")
                    .await?,
            ),
            "14" => match prompt.ask_optional("Backup path: ").await? {
                Some(path) => Action::Rollback(PathBuf::from(path)),
                None => continue,
            },
            "15" => Action::Config,
            other => {
                println!("Invalid option: {other}");
                continue;
            }
        };

        if let Err(e) = commands::execute(action, manager, output).await {
            if !e.is_recoverable() {
                return Err(e);
            }
            output.error(&e.to_string());
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn service_action(prompt: &mut Prompt, op: ServiceOp) -> Result<Action> {
    let service = prompt
        .ask_optional("Service name (blank for all): ")
        .await?;
    Ok(Action::Service(op, service))
}

fn display_menu<E: Executor>(manager: &ComposeManager<E>) {
    println!(
        "\n=== Docker Compose Manager - Environment: {} ===",
        manager.environment()
    );
    for (number, label) in [
        (1, "Start services"),
        (2, "Stop services"),
        (3, "Restart services"),
        (4, "Check status"),
        (5, "View logs"),
        (6, "Remove services"),
        (7, "Build services"),
        (8, "Pull images"),
        (9, "Switch environment"),
        (10, "Monitor services"),
        (11, "Check service health"),
        (12, "Deploy services"),
        (13, "Create backup"),
        (14, "Rollback deployment"),
        (15, "Show configuration"),
        (0, "Exit"),
    ] {
        println!("{number}. {label}");
    }
    println!("{}", "=".repeat(SEPARATOR_WIDTH));
    println!("Current environment: {}", manager.environment());
    println!("Compose file: {}", manager.compose_file().display());
    if let Some(env_file) = manager.env_file() {
        println!("Environment file: {}", env_file.display());
    }
    println!("{}", "=".repeat(SEPARATOR_WIDTH));
}
