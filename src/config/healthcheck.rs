// ABOUTME: Per-environment container healthcheck settings.
// ABOUTME: Durations accept humantime strings ("30s", "1m") or plain integer seconds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthcheckConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval", with = "duration")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "duration")]
    pub timeout: Duration,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval: default_interval(),
            timeout: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_retries() -> u32 {
    3
}

/// Humantime strings or whole seconds in, humantime strings out.
mod duration {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub use humantime_serde::serialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Human(humantime_serde::Serde<Duration>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Duration::from_secs(secs),
            Raw::Human(human) => human.into_inner(),
        })
    }
}
