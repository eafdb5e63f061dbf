// ABOUTME: Built-in default configuration document and the shallow merge over it.
// ABOUTME: Top-level keys fill in when absent; mapping defaults fill one nested level.

use serde_yaml::{Mapping, Value};

const DEFAULT_CONFIG: &str = r#"
project:
  name: docker-compose-manager
  version: 1.0.0
environments:
  dev:
    compose_file: docker-compose.yml
services: []
monitoring:
  enabled: false
  interval: 60
deployment:
  strategy: recreate
  rollback_on_failure: true
  max_surge: 1
  max_unavailable: 0
backup:
  enabled: false
  destination: ./backups
  retention: 30
logging:
  level: info
"#;

/// The default configuration document.
pub fn default_document() -> Mapping {
    match serde_yaml::from_str(DEFAULT_CONFIG) {
        Ok(Value::Mapping(mapping)) => mapping,
        _ => unreachable!("built-in default configuration is a YAML mapping"),
    }
}

/// Fill `loaded` with anything the defaults have that it lacks.
///
/// Sequences and scalars are only ever replaced when absent; a mapping default
/// contributes its own keys one level deep. Explicit nulls count as absent.
pub fn merge_with_defaults(mut loaded: Mapping, defaults: Mapping) -> Mapping {
    for (key, default) in defaults {
        match loaded.get_mut(&key) {
            None | Some(Value::Null) => {
                loaded.insert(key, default);
            }
            Some(Value::Mapping(existing)) => {
                if let Value::Mapping(default_map) = default {
                    for (sub_key, sub_default) in default_map {
                        if !existing.contains_key(&sub_key) {
                            existing.insert(sub_key, sub_default);
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }
    loaded
}
