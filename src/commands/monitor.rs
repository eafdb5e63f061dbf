// ABOUTME: Monitoring, health and report commands.
// ABOUTME: Output follows the active mode; JSON mode emits one line per snapshot or record.

use dcm::compose::ComposeManager;
use dcm::error::Result;
use dcm::exec::Executor;
use dcm::health::{HealthChecker, HealthRecord};
use dcm::monitor::monitor_services;
use dcm::output::{Output, OutputMode};
use dcm::status::StatusReport;
use dcm::types::ServiceName;
use std::time::Duration;

pub async fn monitor<E: Executor>(
    manager: &ComposeManager<E>,
    duration: Option<Duration>,
    output: &Output,
) -> Result<()> {
    let interval = manager.config().monitoring.interval();
    output.progress(&format!(
        "Starting service monitoring (interval: {}s)...",
        interval.as_secs()
    ));
    output.progress("Press Ctrl+C to stop monitoring");

    let ticks = monitor_services(manager, duration, |snapshot| {
        if output.mode() == OutputMode::Json {
            output.data("status", snapshot);
        } else {
            output.block(&snapshot.render());
        }
    })
    .await?;

    match ticks {
        Some(_) => output.progress("\nMonitoring stopped"),
        None => output.warning("Monitoring is not enabled in configuration"),
    }
    Ok(())
}

pub async fn health<E: Executor>(
    manager: &ComposeManager<E>,
    service: Option<&ServiceName>,
    output: &Output,
) -> Result<()> {
    let checker = HealthChecker::new(manager.executor());
    let records = match service {
        Some(service) => vec![checker.check_service(service).await],
        None => {
            let snapshot = manager.service_status().await;
            checker.check_all(&snapshot).await
        }
    };

    if output.mode() == OutputMode::Json {
        output.data("health", &records);
        return Ok(());
    }

    if records.is_empty() {
        output.progress("No services found");
    }
    for record in &records {
        println!("{}", render(record));
    }
    Ok(())
}

fn render(record: &HealthRecord) -> String {
    let marker = if record.running { "✅" } else { "❌" };
    let status = if record.status.is_empty() {
        "not running"
    } else {
        record.status.as_str()
    };
    format!(
        "{marker} {}: {} (health: {})",
        record.service, status, record.health_status
    )
}

pub async fn report<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    let snapshot = manager.service_status().await;
    if let Some(error) = &snapshot.error {
        output.warning(error);
    }
    let report = StatusReport::new(manager.environment(), snapshot);

    if output.mode() == OutputMode::Json {
        output.data("report", &report);
        return Ok(());
    }

    println!("Environment: {}", report.environment);
    println!(
        "Services: {} total, {} running, {} stopped, {} unknown",
        report.total_services, report.counts.running, report.counts.stopped, report.counts.unknown
    );
    for service in &report.services {
        println!("  {}: {} - {}", service.name, service.state, service.status);
    }
    Ok(())
}
