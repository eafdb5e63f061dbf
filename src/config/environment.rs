// ABOUTME: Environment definitions: which compose file, env file, and build flags to use.
// ABOUTME: The compose file falls back to docker-compose.yml when unset.

use super::HealthcheckConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,

    #[serde(default)]
    pub auto_restart: bool,

    #[serde(default)]
    pub build_options: Vec<String>,

    #[serde(default)]
    pub networks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthcheckConfig>,
}

impl EnvironmentConfig {
    /// The compose file for this environment, `docker-compose.yml` if unset.
    pub fn compose_file(&self) -> &Path {
        self.compose_file
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_COMPOSE_FILE))
    }

    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }
}
