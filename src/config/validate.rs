// ABOUTME: Shallow shape validation of the merged configuration tree.
// ABOUTME: Errors abort manager construction; warnings are only logged.

use crate::deploy::DeployStrategy;
use crate::types::{EnvironmentName, PortSpec, check_path};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Outcome of validating a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a merged configuration document.
pub fn validate(doc: &Mapping) -> ValidationReport {
    let mut report = ValidationReport::default();

    match doc.get("environments") {
        None => report
            .warnings
            .push("No environments defined in config".to_string()),
        Some(Value::Mapping(envs)) => {
            for (name, env) in envs {
                validate_environment(&key_text(name), env, &mut report);
            }
        }
        Some(_) => report
            .errors
            .push("environments must be a mapping".to_string()),
    }

    if let Some(deployment) = doc.get("deployment") {
        match deployment {
            Value::Mapping(deployment) => {
                if let Some(strategy) = deployment.get("strategy") {
                    let known = strategy
                        .as_str()
                        .is_some_and(|s| s.parse::<DeployStrategy>().is_ok());
                    if !known {
                        report.warnings.push(format!(
                            "Unknown deployment strategy '{}'",
                            scalar_text(strategy)
                        ));
                    }
                }
            }
            _ => report
                .errors
                .push("deployment must be a mapping".to_string()),
        }
    }

    if let Some(monitoring) = doc.get("monitoring") {
        match monitoring {
            Value::Mapping(monitoring) => {
                if let Some(enabled) = monitoring.get("enabled")
                    && !enabled.is_bool()
                {
                    report
                        .errors
                        .push("monitoring.enabled must be a boolean".to_string());
                }
                if let Some(interval) = monitoring.get("interval")
                    && !interval.as_u64().is_some_and(|n| n > 0)
                {
                    report
                        .errors
                        .push("monitoring.interval must be a positive integer".to_string());
                }
            }
            _ => report
                .errors
                .push("monitoring must be a mapping".to_string()),
        }
    }

    if let Some(Value::Sequence(services)) = doc.get("services") {
        for service in services {
            validate_service(service, &mut report);
        }
    }

    report
}

fn validate_environment(name: &str, env: &Value, report: &mut ValidationReport) {
    if EnvironmentName::new(name).is_err() {
        report.warnings.push(format!(
            "Environment name '{name}' contains characters outside [A-Za-z0-9_-] and cannot be selected"
        ));
    }

    let Value::Mapping(env) = env else {
        report
            .errors
            .push(format!("Environment '{name}' must be a mapping"));
        return;
    };

    for field in ["compose_file", "env_file"] {
        match env.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(path)) => {
                if let Err(e) = check_path(Path::new(path)) {
                    report
                        .errors
                        .push(format!("Environment '{name}' {field}: {e}"));
                }
            }
            Some(_) => report
                .errors
                .push(format!("Environment '{name}' {field} must be a string")),
        }
    }

    match env.get("build_options") {
        None => {}
        Some(Value::Sequence(options)) => {
            if options.iter().any(|o| !o.is_string()) {
                report.errors.push(format!(
                    "Environment '{name}' build_options must contain strings"
                ));
            }
        }
        Some(_) => report
            .errors
            .push(format!("Environment '{name}' build_options must be a list")),
    }
}

fn validate_service(service: &Value, report: &mut ValidationReport) {
    let Value::Mapping(service) = service else {
        return;
    };
    let name = service
        .get("name")
        .map(scalar_text)
        .unwrap_or_else(|| "<unnamed>".to_string());

    match service.get("ports") {
        None => {}
        Some(Value::Sequence(ports)) => {
            for port in ports {
                let valid = serde_yaml::from_value::<PortSpec>(port.clone())
                    .is_ok_and(|p| p.is_valid());
                if !valid {
                    report.errors.push(format!(
                        "Service '{name}' has invalid port: {}",
                        scalar_text(port)
                    ));
                }
            }
        }
        Some(_) => report
            .errors
            .push(format!("Service '{name}' ports must be a list")),
    }
}

fn key_text(key: &Value) -> String {
    scalar_text(key)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
