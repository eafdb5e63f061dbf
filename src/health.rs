// ABOUTME: Per-container health records from `docker ps` and `docker inspect`.
// ABOUTME: Health lookups are best-effort; failures degrade to `unknown` rather than erroring.

use crate::exec::Executor;
use crate::status::StatusSnapshot;
use crate::types::ServiceName;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Docker healthcheck status of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Starting,
    Unknown,
}

impl HealthStatus {
    /// Interpret `docker inspect` output; anything unrecognised is `Unknown`.
    pub fn parse(output: &str) -> Self {
        match output.trim().to_lowercase().as_str() {
            "healthy" => HealthStatus::Healthy,
            "unhealthy" => HealthStatus::Unhealthy,
            "starting" => HealthStatus::Starting,
            _ => HealthStatus::Unknown,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Starting => "starting",
            HealthStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthRecord {
    pub service: String,
    pub running: bool,
    pub health_status: HealthStatus,
    pub status: String,
    pub timestamp: DateTime<Local>,
}

impl HealthRecord {
    fn new(service: &ServiceName, running: bool, health_status: HealthStatus, status: &str) -> Self {
        Self {
            service: service.to_string(),
            running,
            health_status,
            status: status.to_string(),
            timestamp: Local::now(),
        }
    }
}

/// Runs health lookups through an executor.
pub struct HealthChecker<'a, E> {
    executor: &'a E,
}

impl<'a, E: Executor> HealthChecker<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub async fn check_service(&self, service: &ServiceName) -> HealthRecord {
        let env = HashMap::new();
        let ps = format!("docker ps --filter name={service} --format '{{{{.Status}}}}'");

        let status = match self.executor.run(&ps, &env).await {
            Ok(output) => output.trim().to_string(),
            Err(e) => {
                tracing::debug!(%service, "docker ps failed: {}", e);
                return HealthRecord::new(service, false, HealthStatus::Unknown, "Not found");
            }
        };

        if status.is_empty() {
            return HealthRecord::new(service, false, HealthStatus::Unknown, "");
        }

        let running = status.contains("Up") || status.to_lowercase().contains("running");

        let inspect = format!("docker inspect --format='{{{{.State.Health.Status}}}}' {service}");
        let health = match self.executor.run(&inspect, &env).await {
            Ok(output) => HealthStatus::parse(&output),
            Err(e) => {
                tracing::debug!(%service, "no health status: {}", e);
                HealthStatus::Unknown
            }
        };

        HealthRecord::new(service, running, health, &status)
    }

    /// Check every named service in `snapshot`. Rows without a usable name
    /// are skipped.
    pub async fn check_all(&self, snapshot: &StatusSnapshot) -> Vec<HealthRecord> {
        let mut records = Vec::new();
        for row in &snapshot.services {
            if row.name == "Unknown" {
                continue;
            }
            let Ok(name) = ServiceName::new(&row.name) else {
                tracing::warn!("Skipping health check for service '{}'", row.name);
                continue;
            };
            records.push(self.check_service(&name).await);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_health_output() {
        assert_eq!(HealthStatus::parse("healthy\n"), HealthStatus::Healthy);
        assert_eq!(HealthStatus::parse("Unhealthy"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::parse("starting"), HealthStatus::Starting);
        assert_eq!(HealthStatus::parse(""), HealthStatus::Unknown);
        assert_eq!(HealthStatus::parse("<no value>"), HealthStatus::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Starting).unwrap(),
            "\"starting\""
        );
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
    }
}
