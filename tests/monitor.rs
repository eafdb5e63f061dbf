// ABOUTME: Integration tests for the status monitor loop.
// ABOUTME: Uses paused tokio time so interval and deadline behavior is deterministic.

mod support;

use dcm::monitor::{StatusMonitor, monitor_services};
use std::time::Duration;
use support::ScriptedExecutor;

const PS_JSON: &str = r#"{"Name":"web","State":"running","Status":"Up 2 minutes"}"#;

#[tokio::test(start_paused = true)]
async fn deadline_stops_after_expected_polls() {
    support::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().respond("ps --format json", PS_JSON);
    let yaml = support::two_env_config(dir.path(), false);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let mut seen = Vec::new();
    let ticks = monitor_services(&manager, Some(Duration::from_secs(150)), |snapshot| {
        seen.push(snapshot.services.len());
    })
    .await
    .unwrap();

    // Polls at 0s, 60s and 120s; the deadline lands before 180s.
    assert_eq!(ticks, Some(3));
    assert_eq!(seen, vec![1, 1, 1]);
    assert_eq!(executor.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn disabled_monitoring_never_polls() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new();
    let yaml = support::two_env_config(dir.path(), false)
        .replace("monitoring:\n  enabled: true", "monitoring:\n  enabled: false");
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let ticks = monitor_services(&manager, Some(Duration::from_secs(10)), |_| {})
        .await
        .unwrap();

    assert_eq!(ticks, None);
    assert!(executor.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_before_run_takes_no_polls() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new();
    let yaml = support::two_env_config(dir.path(), false);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let (monitor, handle) = StatusMonitor::new(&manager, Duration::from_secs(5));
    handle.cancel();

    assert_eq!(monitor.run(|_| {}).await, 0);
    assert!(executor.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_polls_keep_the_loop_running() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().fail_on("ps --format json");
    let yaml = support::two_env_config(dir.path(), false);
    let manager = support::scripted_manager(&yaml, "dev", executor);

    let (monitor, handle) = StatusMonitor::new(&manager, Duration::from_secs(10));
    let _deadline = handle.cancel_after(Duration::from_secs(25));

    let mut errors = Vec::new();
    let ticks = monitor
        .run(|snapshot| errors.push(snapshot.error.clone()))
        .await;

    assert_eq!(ticks, 3);
    assert!(
        errors
            .iter()
            .all(|e| e.as_deref() == Some("Failed to get service status"))
    );
}

#[tokio::test(start_paused = true)]
async fn zero_interval_polls_once_per_second() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ScriptedExecutor::new().respond("ps --format json", PS_JSON);
    let yaml = support::two_env_config(dir.path(), false);
    let manager = support::scripted_manager(&yaml, "dev", executor.clone());

    let (monitor, handle) = StatusMonitor::new(&manager, Duration::ZERO);
    let _deadline = handle.cancel_after(Duration::from_millis(2500));

    // Polls at 0s, 1s and 2s.
    assert_eq!(monitor.run(|_| {}).await, 3);
    assert_eq!(executor.calls().len(), 3);
}
