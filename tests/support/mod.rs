// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted executor double and config fixtures for integration tests.

use async_trait::async_trait;
use dcm::compose::ComposeManager;
use dcm::config::Config;
use dcm::exec::{ExecError, Executor};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("dcm=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One recorded executor invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub command: String,
    pub env: HashMap<String, String>,
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    failures: Vec<String>,
    outputs: Vec<(String, String)>,
}

/// Records every command and answers from a script instead of spawning.
///
/// Clones share the same script, so a test can keep a handle while the
/// manager owns another.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    script: Arc<Mutex<Script>>,
}

#[allow(dead_code)]
impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `pattern` exit with status 1.
    pub fn fail_on(self, pattern: &str) -> Self {
        self.script.lock().failures.push(pattern.to_string());
        self
    }

    /// Commands containing `pattern` print `output`.
    pub fn respond(self, pattern: &str, output: &str) -> Self {
        self.script
            .lock()
            .outputs
            .push((pattern.to_string(), output.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    pub fn clear(&self) {
        self.script.lock().calls.clear();
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn run(&self, command: &str, env: &HashMap<String, String>) -> Result<String, ExecError> {
        let mut script = self.script.lock();
        script.calls.push(Call {
            command: command.to_string(),
            env: env.clone(),
        });

        if script.failures.iter().any(|p| command.contains(p.as_str())) {
            return Err(ExecError::Failed {
                command: command.to_string(),
                code: Some(1),
                output: "scripted failure".to_string(),
            });
        }

        Ok(script
            .outputs
            .iter()
            .find(|(p, _)| command.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

/// Config with `dev` and `prod` environments whose files live in `dir`.
#[allow(dead_code)]
pub fn two_env_config(dir: &Path, backup_enabled: bool) -> String {
    let dir = dir.display();
    format!(
        r#"
project:
  name: shop
environments:
  dev:
    compose_file: {dir}/docker-compose.yml
  prod:
    compose_file: {dir}/docker-compose.prod.yml
    env_file: {dir}/.env.prod
    build_options: ["--no-cache"]
deployment:
  strategy: recreate
  rollback_on_failure: true
backup:
  enabled: {backup_enabled}
  destination: {dir}/backups
  retention: 30
monitoring:
  enabled: true
  interval: 60
"#
    )
}

/// Manager over `yaml` with `environment` active and a scripted executor.
#[allow(dead_code)]
pub fn scripted_manager(
    yaml: &str,
    environment: &str,
    executor: ScriptedExecutor,
) -> ComposeManager<ScriptedExecutor> {
    let config = Config::from_yaml(yaml).unwrap();
    ComposeManager::new(config, environment, executor).unwrap()
}
