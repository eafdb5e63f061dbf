// ABOUTME: Validated service and environment names.
// ABOUTME: Both are interpolated into shell commands, so only [A-Za-z0-9_-] is accepted.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("{0} name cannot be empty")]
    Empty(&'static str),

    #[error("{kind} name exceeds maximum length of 128 characters")]
    TooLong { kind: &'static str },

    #[error("invalid character in {kind} name: '{found}'")]
    InvalidChar { kind: &'static str, found: char },
}

const MAX_NAME_LEN: usize = 128;

fn check_name(kind: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty(kind));
    }

    if value.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong { kind });
    }

    match value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
    {
        Some(found) => Err(NameError::InvalidChar { kind, found }),
        None => Ok(()),
    }
}

/// Name of a compose service, as passed to `docker-compose <cmd> <service>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        check_name("service", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Name of a configured environment (`dev`, `staging`, `prod-1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        check_name("environment", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EnvironmentName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
