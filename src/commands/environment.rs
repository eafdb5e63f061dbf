// ABOUTME: Environment switching and configuration display.
// ABOUTME: Listing marks the active environment with an asterisk.

use dcm::compose::ComposeManager;
use dcm::error::Result;
use dcm::exec::Executor;
use dcm::output::{Output, OutputMode};
use serde::Serialize;
use std::path::Path;

pub fn env<E: Executor>(
    manager: &mut ComposeManager<E>,
    name: Option<&str>,
    output: &Output,
) -> Result<()> {
    let Some(name) = name else {
        return list(manager, output);
    };

    manager.switch_environment(name)?;
    output.success(&format!("Switched to {name} environment"));
    output.progress(&format!("Compose file: {}", manager.compose_file().display()));
    if let Some(env_file) = manager.env_file() {
        output.progress(&format!("Environment file: {}", env_file.display()));
    }
    Ok(())
}

fn list<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    #[derive(Serialize)]
    struct Listing<'a> {
        active: &'a str,
        environments: Vec<String>,
    }

    let environments = manager.config().environment_names();
    if output.mode() == OutputMode::Json {
        output.data(
            "environments",
            &Listing {
                active: manager.environment(),
                environments,
            },
        );
        return Ok(());
    }

    for name in environments {
        let marker = if name == manager.environment() { "*" } else { " " };
        println!("{marker} {name}");
    }
    Ok(())
}

pub fn show_config<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    #[derive(Serialize)]
    struct Shown<'a, C> {
        environment: &'a str,
        compose_file: &'a Path,
        config: &'a C,
    }

    output.progress("=== Current Configuration ===");
    output.progress(&format!("Environment: {}", manager.environment()));
    output.data(
        "config",
        &Shown {
            environment: manager.environment(),
            compose_file: manager.compose_file(),
            config: manager.config(),
        },
    );
    Ok(())
}
