// ABOUTME: Port and port-mapping validation for service definitions.
// ABOUTME: Accepts numbers or "host:container" style strings with each part in 1..=65535.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A port as written in YAML: either a bare number or a mapping string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PortSpec {
    Number(i64),
    Text(String),
}

impl PortSpec {
    pub fn is_valid(&self) -> bool {
        match self {
            PortSpec::Number(n) => in_range(*n),
            PortSpec::Text(s) => s
                .split(':')
                .all(|part| part.parse::<i64>().is_ok_and(in_range)),
        }
    }
}

fn in_range(port: i64) -> bool {
    (1..=65535).contains(&port)
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Number(n) => write!(f, "{n}"),
            PortSpec::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u16> for PortSpec {
    fn from(port: u16) -> Self {
        PortSpec::Number(i64::from(port))
    }
}

impl From<&str> for PortSpec {
    fn from(port: &str) -> Self {
        PortSpec::Text(port.to_string())
    }
}
