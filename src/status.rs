// ABOUTME: Service status snapshots parsed from `docker-compose ps --format json`.
// ABOUTME: Classifies state strings into running / stopped / unknown and renders reports.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One service row from `ps --format json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceStatus {
    #[serde(rename(deserialize = "Name"), default = "unknown")]
    pub name: String,

    #[serde(rename(deserialize = "State"), default = "unknown")]
    pub state: String,

    #[serde(rename(deserialize = "Status"), default)]
    pub status: String,

    #[serde(rename(deserialize = "Ports"), default)]
    pub ports: String,

    #[serde(rename(deserialize = "CreatedAt"), default)]
    pub created: String,
}

fn unknown() -> String {
    "Unknown".to_string()
}

impl ServiceStatus {
    pub fn state_class(&self) -> ServiceState {
        ServiceState::classify(&self.state)
    }
}

/// Coarse service state bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Running,
    Stopped,
    Unknown,
}

impl ServiceState {
    pub fn classify(state: &str) -> Self {
        let state = state.trim().to_lowercase();
        if state.contains("running") || state.starts_with("up") {
            ServiceState::Running
        } else if state.contains("exited") || state.contains("stopped") {
            ServiceState::Stopped
        } else {
            ServiceState::Unknown
        }
    }

    fn marker(self) -> &'static str {
        match self {
            ServiceState::Running => "✅",
            ServiceState::Stopped => "❌",
            ServiceState::Unknown => "⚠️ ",
        }
    }
}

/// Parse `ps --format json` output. Accepts one object per line as well as a
/// single JSON array; lines that fail to parse are dropped.
pub fn parse_ps_output(output: &str) -> Vec<ServiceStatus> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| {
            if line.starts_with('[') {
                serde_json::from_str::<Vec<ServiceStatus>>(line).unwrap_or_default()
            } else {
                serde_json::from_str::<ServiceStatus>(line)
                    .map(|s| vec![s])
                    .unwrap_or_default()
            }
        })
        .collect()
}

/// Point-in-time status of every service in the active compose project.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub services: Vec<ServiceStatus>,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    pub fn from_output(output: &str) -> Self {
        Self {
            services: parse_ps_output(output),
            timestamp: Local::now(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            services: Vec::new(),
            timestamp: Local::now(),
            error: Some(error.into()),
        }
    }

    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for service in &self.services {
            match service.state_class() {
                ServiceState::Running => counts.running += 1,
                ServiceState::Stopped => counts.stopped += 1,
                ServiceState::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// Human-readable block printed on every monitor tick.
    pub fn render(&self) -> String {
        let mut out = format!(
            "\n--- Service Status ({}) ---\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        );

        if let Some(error) = &self.error {
            let _ = writeln!(out, "Error: {error}");
            return out;
        }

        if self.services.is_empty() {
            out.push_str("No services found\n");
            return out;
        }

        for service in &self.services {
            let _ = writeln!(
                out,
                "{} {}: {} - {}",
                service.state_class().marker(),
                service.name,
                service.state,
                service.status
            );
        }
        out.push_str(&"=".repeat(50));
        out.push('\n');
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub running: usize,
    pub stopped: usize,
    pub unknown: usize,
}

/// Aggregate report over a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub timestamp: DateTime<Local>,
    pub environment: String,
    pub total_services: usize,
    #[serde(flatten)]
    pub counts: StateCounts,
    pub services: Vec<ServiceStatus>,
}

impl StatusReport {
    pub fn new(environment: &str, snapshot: StatusSnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            environment: environment.to_string(),
            total_services: snapshot.services.len(),
            counts: snapshot.counts(),
            services: snapshot.services,
        }
    }
}
