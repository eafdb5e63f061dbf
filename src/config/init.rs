// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented dcm.config.yml template with dev and prod environments.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ServiceName;

use super::CONFIG_FILENAME;

/// Write a template config into `dir`, returning its path.
pub fn init_config(dir: &Path, project: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let project = match project {
        Some(name) => ServiceName::new(name)?.to_string(),
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| ServiceName::new(n).ok())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "docker-compose-manager".to_string()),
    };

    std::fs::write(&config_path, generate_template_yaml(&project))?;
    tracing::info!("Wrote {}", config_path.display());

    Ok(config_path)
}

fn generate_template_yaml(project: &str) -> String {
    format!(
        r#"project:
  name: {project}
  version: 1.0.0

environments:
  dev:
    compose_file: docker-compose.yml
    build_options: []
  prod:
    compose_file: docker-compose.prod.yml
    # env_file: .env.prod
    auto_restart: true
    build_options: ["--no-cache"]
    healthcheck:
      enabled: true
      interval: 30s
      timeout: 10s
      retries: 3

monitoring:
  enabled: false
  interval: 60

deployment:
  strategy: recreate
  rollback_on_failure: true
  pre_deploy_hooks: []
  post_deploy_hooks: []

backup:
  # Deployments take a pre_deploy backup first and abort if backups are disabled.
  enabled: true
  destination: ./backups
  retention: 30
"#
    )
}
