// ABOUTME: Integration tests for deployment orchestration.
// ABOUTME: Covers strategy equivalence, hook failures, rollback and terminal outcomes.

mod support;

use dcm::backup::{BackupError, COMPOSE_SUFFIX, bundle_file};
use dcm::deploy::{
    DeployError, DeployErrorKind, DeployOutcome, DeployStep, Deployer, RollbackOutcome,
};
use dcm::diagnostics::WarningKind;
use std::fs;
use std::path::Path;
use support::ScriptedExecutor;

fn project(dir: &Path, hooks: &str, backup_enabled: bool) -> String {
    fs::write(dir.join("docker-compose.yml"), "services: {}\n").unwrap();
    support::two_env_config(dir, backup_enabled)
        .replace("deployment:\n", &format!("deployment:\n{hooks}"))
}

fn with_hooks(pre: &[&str], post: &[&str]) -> String {
    let list = |items: &[&str]| {
        items
            .iter()
            .map(|h| format!("\"{h}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "  pre_deploy_hooks: [{}]\n  post_deploy_hooks: [{}]\n",
        list(pre),
        list(post)
    )
}

fn body_commands(executor: &ScriptedExecutor) -> Vec<String> {
    executor
        .commands()
        .into_iter()
        .filter(|c| c.starts_with("docker-compose") && !c.contains("ps --format json"))
        .collect()
}

#[tokio::test]
async fn recreate_runs_pull_stop_build_start() {
    support::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new();
    let yaml = project(dir.path(), "", true);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let outcome = Deployer::new(&manager).deploy(None).await;
    assert!(matches!(outcome, DeployOutcome::Deployed));

    let compose = dir.path().join("docker-compose.yml");
    let file = compose.display();
    assert_eq!(
        body_commands(&executor),
        vec![
            format!("docker-compose -f {file} pull"),
            format!("docker-compose -f {file} stop"),
            format!("docker-compose -f {file} build"),
            format!("docker-compose -f {file} up -d"),
        ]
    );
    assert!(bundle_file(&dir.path().join("backups/pre_deploy"), COMPOSE_SUFFIX).exists());
}

#[tokio::test]
async fn every_strategy_runs_the_same_commands() {
    let mut sequences = Vec::new();
    for strategy in ["recreate", "rolling", "blue-green"] {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new();
        let yaml = project(dir.path(), "", true);
        let manager = support::scripted_manager(&yaml, "dev", executor.clone());

        let outcome = Deployer::new(&manager).deploy(Some(strategy)).await;
        assert!(matches!(outcome, DeployOutcome::Deployed), "{strategy}");

        let prefix = dir.path().display().to_string();
        let normalized: Vec<String> = body_commands(&executor)
            .into_iter()
            .map(|c| c.replace(&prefix, "<dir>"))
            .collect();
        sequences.push(normalized);
    }
    assert_eq!(sequences[0], sequences[1]);
    assert_eq!(sequences[0], sequences[2]);
}

#[tokio::test]
async fn unknown_strategy_deploys_as_recreate_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = project(dir.path(), "", true);
    let manager = support::scripted_manager(&yaml, "dev", ScriptedExecutor::new());

    match Deployer::new(&manager).deploy(Some("canary")).await {
        DeployOutcome::DeployedWithWarnings(warnings) => {
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].kind, WarningKind::UnknownStrategy);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn failing_pre_deploy_hook_rolls_back_without_running_body() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on("./check-migrations.sh");
    let yaml = project(
        dir.path(),
        &with_hooks(&["./check-migrations.sh $DCM_ENVIRONMENT"], &[]),
        true,
    );
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let outcome = Deployer::new(&manager).deploy(None).await;
    match outcome {
        DeployOutcome::Failed { error, rollback } => {
            assert_eq!(error.kind(), DeployErrorKind::Hook);
            match error {
                DeployError::PreDeployHook { command, .. } => {
                    assert_eq!(command, "./check-migrations.sh dev");
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(rollback, RollbackOutcome::Succeeded);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let commands = executor.commands();
    assert!(!commands.iter().any(|c| c.ends_with(" pull")));
    assert!(!commands.iter().any(|c| c.ends_with(" build")));
    // Rollback restarts services.
    assert!(commands.iter().any(|c| c.ends_with(" up -d")));

    let hook_call = executor
        .calls()
        .into_iter()
        .find(|c| c.command.starts_with("./check-migrations.sh"))
        .unwrap();
    assert_eq!(hook_call.env["DCM_ENVIRONMENT"], "dev");
    assert_eq!(hook_call.env["DCM_STRATEGY"], "recreate");
    assert!(hook_call.env["DCM_BACKUP"].ends_with("pre_deploy"));
}

#[tokio::test]
async fn build_failure_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on(" build");
    let yaml = project(dir.path(), "", true);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    match Deployer::new(&manager).deploy(None).await {
        DeployOutcome::Failed { error, rollback } => {
            assert!(error.to_string().contains("scripted failure"), "{error}");
            assert!(matches!(
                error,
                DeployError::Step {
                    step: DeployStep::Build,
                    ..
                }
            ));
            assert_eq!(rollback, RollbackOutcome::Succeeded);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(
        dir.path().join("docker-compose.yml.failed").exists(),
        "current compose file is set aside during rollback"
    );
}

#[tokio::test]
async fn stop_failure_does_not_fail_the_body() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on(" stop");
    let yaml = project(dir.path(), "", true);
    let manager = support::scripted_manager(&yaml, "dev", executor);

    let outcome = Deployer::new(&manager).deploy(None).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn start_failure_with_failed_rollback_still_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on("up -d");
    let yaml = project(dir.path(), "", true);
    let manager = support::scripted_manager(&yaml, "dev", executor);

    match Deployer::new(&manager).deploy(None).await {
        DeployOutcome::Failed { error, rollback } => {
            assert!(matches!(
                error,
                DeployError::Step {
                    step: DeployStep::Start,
                    ..
                }
            ));
            assert!(matches!(rollback, RollbackOutcome::Failed(_)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn no_rollback_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on(" pull");
    let yaml = project(dir.path(), "", true)
        .replace("rollback_on_failure: true", "rollback_on_failure: false");
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    match Deployer::new(&manager).deploy(None).await {
        DeployOutcome::Failed { rollback, .. } => {
            assert_eq!(rollback, RollbackOutcome::NotAttempted);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!executor.commands().iter().any(|c| c.ends_with(" up -d")));
}

#[tokio::test]
async fn disabled_backups_abort_before_anything_runs() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new();
    let yaml = project(dir.path(), "", false);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    match Deployer::new(&manager).deploy(None).await {
        DeployOutcome::Failed { error, rollback } => {
            assert_eq!(error.kind(), DeployErrorKind::Backup);
            assert!(matches!(error, DeployError::Backup(BackupError::Disabled)));
            assert_eq!(rollback, RollbackOutcome::NotAttempted);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn post_deploy_hook_failure_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on("notify");
    let yaml = project(dir.path(), &with_hooks(&[], &["notify --channel ops"]), true);
    let manager = support::scripted_manager(&yaml, "dev", executor);

    match Deployer::new(&manager).deploy(None).await {
        DeployOutcome::DeployedWithWarnings(warnings) => {
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].kind, WarningKind::PostDeployHook);
            assert!(warnings[0].message.contains("notify --channel ops"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
