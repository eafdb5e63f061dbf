// ABOUTME: Configuration types and loading for dcm.config.yml.
// ABOUTME: Merges the file over built-in defaults, validates its shape, then deserializes typed sections.

mod defaults;
mod env_file;
mod environment;
mod healthcheck;
mod init;
mod validate;

pub use defaults::{default_document, merge_with_defaults};
pub use env_file::{
    environment_variables, expand_variables, is_passthrough_var, parse_env_file, process_vars,
};
pub use environment::{DEFAULT_COMPOSE_FILE, EnvironmentConfig};
pub use healthcheck::HealthcheckConfig;
pub use init::init_config;
pub use validate::{ValidationReport, validate};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "dcm.config.yml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    #[serde(default)]
    pub services: Vec<Value>,

    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub deployment: DeploymentConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(
        default = "default_project_version",
        deserialize_with = "deserialize_scalar_string"
    )]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            version: default_project_version(),
            description: None,
        }
    }
}

fn default_project_name() -> String {
    "docker-compose-manager".to_string()
}

fn default_project_version() -> String {
    "1.0.0".to_string()
}

// `version: 1.2` parses as a float; keep it as written.
fn deserialize_scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(serde::de::Error::custom("expected a string")),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Poll interval in seconds.
    #[serde(default = "default_monitor_interval")]
    pub interval: u64,

    /// Days of monitoring logs to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention: Option<u32>,

    #[serde(default)]
    pub alerts: AlertsConfig,
}

impl MonitoringConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: default_monitor_interval(),
            log_retention: None,
            alerts: AlertsConfig::default(),
        }
    }
}

fn default_monitor_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AlertsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeploymentConfig {
    /// Strategy label; unrecognised labels deploy as `recreate`.
    #[serde(
        default = "default_strategy",
        deserialize_with = "deserialize_scalar_string"
    )]
    pub strategy: String,

    #[serde(default = "default_max_surge")]
    pub max_surge: u32,

    #[serde(default)]
    pub max_unavailable: u32,

    #[serde(default = "default_true")]
    pub rollback_on_failure: bool,

    #[serde(default)]
    pub pre_deploy_hooks: Vec<String>,

    #[serde(default)]
    pub post_deploy_hooks: Vec<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            max_surge: default_max_surge(),
            max_unavailable: 0,
            rollback_on_failure: true,
            pre_deploy_hooks: Vec::new(),
            post_deploy_hooks: Vec::new(),
        }
    }
}

fn default_strategy() -> String {
    "recreate".to_string()
}

fn default_max_surge() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackupConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    /// Days to keep bundles before `prune` removes them; 0 keeps everything.
    #[serde(default = "default_retention")]
    pub retention: u32,

    #[serde(default)]
    pub volumes: Vec<String>,

    #[serde(default = "default_backup_destination")]
    pub destination: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule: None,
            retention: default_retention(),
            volumes: Vec::new(),
            destination: default_backup_destination(),
        }
    }
}

fn default_retention() -> u32 {
    30
}

fn default_backup_destination() -> PathBuf {
    PathBuf::from("./backups")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    #[serde(default)]
    pub options: BTreeMap<String, Value>,

    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            driver: None,
            options: BTreeMap::new(),
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourcesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Value>,
}

impl Config {
    /// Parse a YAML document, merge defaults and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let loaded = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::Config(
                    "top-level document must be a mapping".to_string(),
                ));
            }
        };
        Self::from_mapping(loaded)
    }

    /// Load from `path`. A missing or unparsable file yields the defaults
    /// with a warning; shape errors in a parsed file are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Self::from_mapping(Mapping::new());
        }

        let loaded = match std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|content| serde_yaml::from_str::<Value>(&content).map_err(Error::from))
        {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                tracing::warn!(
                    "Configuration file {} is not a mapping, using defaults",
                    path.display()
                );
                Mapping::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load config from {}: {}; using defaults",
                    path.display(),
                    e
                );
                Mapping::new()
            }
        };

        Self::from_mapping(loaded)
    }

    fn from_mapping(loaded: Mapping) -> Result<Self> {
        let merged = merge_with_defaults(loaded, default_document());

        let report = validate(&merged);
        for warning in &report.warnings {
            tracing::warn!("Configuration warning: {}", warning);
        }
        if !report.is_ok() {
            return Err(Error::InvalidConfig(report.errors));
        }

        serde_yaml::from_value(Value::Mapping(merged))
            .map_err(|e| Error::Config(format!("invalid configuration value: {e}")))
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.get(name)
    }

    /// Configured environment names in sorted order.
    pub fn environment_names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }
}
