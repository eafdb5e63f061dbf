// ABOUTME: docker-compose command line rendering.
// ABOUTME: Produces `docker-compose -f <file> <subcommand> [args] [service]` strings for the executor.

use crate::types::ServiceName;
use std::fmt;
use std::path::Path;

/// A `docker-compose` invocation against one compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    compose_file: String,
    subcommand: &'static str,
    args: Vec<String>,
    service: Option<String>,
}

impl ComposeCommand {
    pub fn new(compose_file: &Path, subcommand: &'static str) -> Self {
        Self {
            compose_file: compose_file.display().to_string(),
            subcommand,
            args: Vec::new(),
            service: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn service(mut self, service: Option<&ServiceName>) -> Self {
        self.service = service.map(|s| s.as_str().to_owned());
        self
    }
}

impl fmt::Display for ComposeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docker-compose -f {} {}", self.compose_file, self.subcommand)?;
        for arg in self.args.iter().filter(|a| !a.is_empty()) {
            write!(f, " {arg}")?;
        }
        if let Some(service) = &self.service {
            write!(f, " {service}")?;
        }
        Ok(())
    }
}
