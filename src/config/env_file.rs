// ABOUTME: Env-file parsing and the variables injected into child processes.
// ABOUTME: DOCKER_HOST, COMPOSE_PROJECT_NAME and DCM_* process variables override env-file values.

use std::collections::HashMap;
use std::path::Path;

const PASSTHROUGH_VARS: [&str; 2] = ["DOCKER_HOST", "COMPOSE_PROJECT_NAME"];
const PASSTHROUGH_PREFIX: &str = "DCM_";

/// Parse `KEY=VALUE` lines, skipping blanks, comments and lines without `=`.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Whether a process variable is forwarded into compose invocations.
pub fn is_passthrough_var(key: &str) -> bool {
    key.starts_with(PASSTHROUGH_PREFIX) || PASSTHROUGH_VARS.contains(&key)
}

/// Process variables whose key and value are both valid Unicode. Others are
/// skipped rather than aborting the run.
pub fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Variables for an environment: its env file (if readable) overlaid with
/// passthrough variables from `process_vars`.
pub fn environment_variables<I>(env_file: Option<&Path>, process_vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut vars = match env_file {
        Some(path) if path.exists() => match std::fs::read_to_string(path) {
            Ok(content) => parse_env_file(&content),
            Err(e) => {
                tracing::warn!("Could not read environment file {}: {}", path.display(), e);
                HashMap::new()
            }
        },
        _ => HashMap::new(),
    };

    vars.extend(process_vars.into_iter().filter(|(k, _)| is_passthrough_var(k)));
    vars
}

/// Replace `${KEY}` and `$KEY` references with values from `vars`.
///
/// Longer keys are substituted first so `$DCM_ENV` never clobbers
/// `$DCM_ENVIRONMENT`.
pub fn expand_variables(text: &str, vars: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = vars.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut out = text.to_string();
    for key in keys {
        let value = &vars[key];
        out = out.replace(&format!("${{{key}}}"), value);
        out = out.replace(&format!("${key}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_key_values() {
        let vars = parse_env_file("# comment\n\nDB_HOST=db\nURL=http://x?a=b\nNOEQUALS\n  PORT = 5432\n");
        assert_eq!(vars.get("DB_HOST").map(String::as_str), Some("db"));
        assert_eq!(vars.get("URL").map(String::as_str), Some("http://x?a=b"));
        assert_eq!(vars.get("PORT ").map(String::as_str), Some(" 5432"));
        assert!(!vars.contains_key("NOEQUALS"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn passthrough_filter() {
        assert!(is_passthrough_var("DOCKER_HOST"));
        assert!(is_passthrough_var("COMPOSE_PROJECT_NAME"));
        assert!(is_passthrough_var("DCM_ENV"));
        assert!(!is_passthrough_var("HOME"));
        assert!(!is_passthrough_var("XDCM_ENV"));
    }

    #[test]
    fn process_vars_override_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DCM_TAG=from-file\nAPP_MODE=prod").unwrap();

        let vars = environment_variables(
            Some(file.path()),
            vec![
                ("DCM_TAG".to_string(), "from-process".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ],
        );
        assert_eq!(vars["DCM_TAG"], "from-process");
        assert_eq!(vars["APP_MODE"], "prod");
        assert!(!vars.contains_key("HOME"));
    }

    #[test]
    fn missing_env_file_yields_only_passthrough() {
        let vars = environment_variables(
            Some(Path::new("/nonexistent/.env")),
            vec![("DOCKER_HOST".to_string(), "tcp://x:2375".to_string())],
        );
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn expands_both_forms() {
        let mut vars = HashMap::new();
        vars.insert("DCM_ENV".to_string(), "prod".to_string());
        vars.insert("DCM_ENVIRONMENT".to_string(), "staging".to_string());
        assert_eq!(
            expand_variables("deploy ${DCM_ENV} $DCM_ENVIRONMENT $UNSET", &vars),
            "deploy prod staging $UNSET"
        );
    }
}
