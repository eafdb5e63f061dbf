// ABOUTME: Integration tests for configuration loading and validation.
// ABOUTME: Tests default merging, fatal shape errors, and env-file variable resolution.

mod support;

use dcm::compose::ComposeManager;
use dcm::config::*;
use dcm::error::{Error, ErrorKind};
use std::fs;
use std::path::Path;
use support::ScriptedExecutor;

mod loading {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.environment_names(), vec!["dev"]);
        assert_eq!(
            config.environment("dev").unwrap().compose_file(),
            Path::new(DEFAULT_COMPOSE_FILE)
        );
    }

    #[test]
    fn unparsable_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "environments: [unclosed\n  : :").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.project.name, "docker-compose-manager");
    }

    #[test]
    fn file_values_override_defaults_one_level_deep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "monitoring:\n  enabled: true\nbackup:\n  destination: /srv/backups\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.monitoring.enabled);
        assert_eq!(config.monitoring.interval, 60);
        assert_eq!(config.backup.destination, Path::new("/srv/backups"));
        assert_eq!(config.backup.retention, 30);
        assert!(!config.backup.enabled);
    }

    #[test]
    fn default_dev_environment_is_filled_in() {
        let config = Config::from_yaml(
            "environments:\n  prod:\n    compose_file: docker-compose.prod.yml\n",
        )
        .unwrap();
        assert_eq!(config.environment_names(), vec!["dev", "prod"]);
    }

    #[test]
    fn shape_errors_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "environments:\n  prod: nope\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("Environment 'prod' must be a mapping"));
    }

    #[test]
    fn type_mismatch_after_validation_is_a_config_error() {
        let err = Config::from_yaml("backup:\n  retention: forever\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn healthcheck_durations_parse() {
        let config = Config::from_yaml(
            "environments:\n  prod:\n    healthcheck:\n      interval: 15s\n      timeout: 2s\n",
        )
        .unwrap();
        let check = config
            .environment("prod")
            .unwrap()
            .healthcheck
            .clone()
            .unwrap();
        assert_eq!(check.interval, std::time::Duration::from_secs(15));
        assert_eq!(check.retries, 3);
    }

    #[test]
    fn healthcheck_durations_accept_plain_seconds() {
        let config = Config::from_yaml(
            "environments:\n  prod:\n    healthcheck:\n      interval: 30\n      timeout: 5\n",
        )
        .unwrap();
        let check = config
            .environment("prod")
            .unwrap()
            .healthcheck
            .clone()
            .unwrap();
        assert_eq!(check.interval, std::time::Duration::from_secs(30));
        assert_eq!(check.timeout, std::time::Duration::from_secs(5));
    }

    #[test]
    fn numeric_strategy_loads_as_a_label() {
        let config = Config::from_yaml("deployment:\n  strategy: 2\n").unwrap();
        assert_eq!(config.deployment.strategy, "2");
    }
}

mod env_vars {
    use super::*;

    fn prod_manager(dir: &Path) -> ComposeManager<ScriptedExecutor> {
        let yaml = support::two_env_config(dir, false);
        support::scripted_manager(&yaml, "prod", ScriptedExecutor::new())
    }

    #[test]
    fn env_file_and_passthrough_vars_are_combined() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".env.prod"),
            "# prod settings\nDB_HOST=db.internal\nDCM_TAG=from-file\n",
        )
        .unwrap();
        let manager = prod_manager(dir.path());

        temp_env::with_vars(
            [
                ("DCM_TAG", Some("from-process")),
                ("DOCKER_HOST", Some("tcp://docker:2375")),
                ("UNRELATED_VAR", Some("ignored")),
            ],
            || {
                let vars = manager.environment_variables();
                assert_eq!(vars["DB_HOST"], "db.internal");
                assert_eq!(vars["DCM_TAG"], "from-process");
                assert_eq!(vars["DOCKER_HOST"], "tcp://docker:2375");
                assert!(!vars.contains_key("UNRELATED_VAR"));
            },
        );
    }

    #[test]
    fn non_unicode_process_vars_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env.prod"), "DB_HOST=db.internal\n").unwrap();
        let manager = prod_manager(dir.path());

        temp_env::with_var("DCM_BAD", Some(OsStr::from_bytes(b"\xff")), || {
            temp_env::with_var("DCM_TAG", Some("ok"), || {
                let vars = manager.environment_variables();
                assert_eq!(vars["DB_HOST"], "db.internal");
                assert_eq!(vars["DCM_TAG"], "ok");
                assert!(!vars.contains_key("DCM_BAD"));
            });
        });
    }

    #[tokio::test]
    async fn start_injects_env_file_vars() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env.prod"), "APP_MODE=production\n").unwrap();
        let executor = ScriptedExecutor::new();
        let yaml = support::two_env_config(dir.path(), false);
        let manager = support::scripted_manager(&yaml, "prod", executor.clone());

        manager.start(None).await.unwrap();
        manager.stop(None).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls[0].env["APP_MODE"], "production");
        assert!(calls[1].env.is_empty());
    }
}

mod init {
    use super::*;

    #[test]
    fn template_loads_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), Some("shop"), false).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.project.name, "shop");
        assert_eq!(config.environment_names(), vec!["dev", "prod"]);
        assert!(config.backup.enabled);
    }

    #[test]
    fn rejects_unsafe_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_config(dir.path(), Some("shop; rm -rf /"), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }
}
