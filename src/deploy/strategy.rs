// ABOUTME: Deployment strategy selection from the command line or configuration.
// ABOUTME: All strategies currently run the same recreate sequence.

use std::fmt;
use std::str::FromStr;

/// Strategy label for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStrategy {
    /// Pull, stop, build, start.
    Recreate,

    /// Accepted for configuration compatibility; deploys as recreate.
    Rolling,

    /// Accepted for configuration compatibility; deploys as recreate.
    BlueGreen,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl DeployStrategy {
    /// Pick the strategy: explicit argument first, then the configured
    /// label. Returns the unrecognised label alongside the fallback so the
    /// caller can warn about it.
    pub fn resolve(explicit: Option<&str>, configured: &str) -> (Self, Option<String>) {
        let label = explicit.unwrap_or(configured);
        match label.parse() {
            Ok(strategy) => (strategy, None),
            Err(UnknownStrategy(label)) => (DeployStrategy::Recreate, Some(label)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStrategy::Recreate => "recreate",
            DeployStrategy::Rolling => "rolling",
            DeployStrategy::BlueGreen => "blue-green",
        }
    }
}

impl FromStr for DeployStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recreate" => Ok(DeployStrategy::Recreate),
            "rolling" => Ok(DeployStrategy::Rolling),
            "blue-green" => Ok(DeployStrategy::BlueGreen),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_overrides_configured() {
        let (strategy, unknown) = DeployStrategy::resolve(Some("blue-green"), "rolling");
        assert_eq!(strategy, DeployStrategy::BlueGreen);
        assert!(unknown.is_none());
    }

    #[test]
    fn configured_used_without_explicit() {
        let (strategy, _) = DeployStrategy::resolve(None, "rolling");
        assert_eq!(strategy, DeployStrategy::Rolling);
    }

    #[test]
    fn unknown_label_falls_back_to_recreate() {
        let (strategy, unknown) = DeployStrategy::resolve(Some("canary"), "recreate");
        assert_eq!(strategy, DeployStrategy::Recreate);
        assert_eq!(unknown.as_deref(), Some("canary"));
    }

    #[test]
    fn display_round_trips_labels() {
        for label in ["recreate", "rolling", "blue-green"] {
            assert_eq!(label.parse::<DeployStrategy>().unwrap().to_string(), label);
        }
    }
}
