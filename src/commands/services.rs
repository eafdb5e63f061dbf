// ABOUTME: Service lifecycle commands: start, stop, restart, remove, build, pull, status, logs.
// ABOUTME: Normal mode relies on the executor's echo; quiet mode prints captured output here.

use dcm::compose::{ComposeManager, LogOptions};
use dcm::error::Result;
use dcm::exec::Executor;
use dcm::output::Output;
use dcm::types::ServiceName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOp {
    Start,
    Stop,
    Restart,
    Remove,
    Build,
    Pull,
}

impl ServiceOp {
    fn progress(&self) -> &'static str {
        match self {
            ServiceOp::Start => "Starting services",
            ServiceOp::Stop => "Stopping services",
            ServiceOp::Restart => "Restarting services",
            ServiceOp::Remove => "Removing services",
            ServiceOp::Build => "Building services",
            ServiceOp::Pull => "Pulling images",
        }
    }

    fn done(&self) -> &'static str {
        match self {
            ServiceOp::Start => "Services started",
            ServiceOp::Stop => "Services stopped",
            ServiceOp::Restart => "Services restarted",
            ServiceOp::Remove => "Services removed",
            ServiceOp::Build => "Services built",
            ServiceOp::Pull => "Images pulled",
        }
    }
}

pub async fn run<E: Executor>(
    manager: &ComposeManager<E>,
    op: ServiceOp,
    service: Option<&ServiceName>,
    output: &Output,
) -> Result<()> {
    output.progress(&format!(
        "{} in {} environment...",
        op.progress(),
        manager.environment()
    ));

    let text = match op {
        ServiceOp::Start => manager.start(service).await?,
        ServiceOp::Stop => manager.stop(service).await?,
        ServiceOp::Restart => manager.restart(service).await?,
        ServiceOp::Remove => manager.remove(service).await?,
        ServiceOp::Build => manager.build(service).await?,
        ServiceOp::Pull => manager.pull(service).await?,
    };

    output.captured(&text);
    output.success(op.done());
    Ok(())
}

pub async fn status<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    output.progress(&format!(
        "Checking service status in {} environment...",
        manager.environment()
    ));
    let text = manager.status().await?;
    output.captured(&text);
    Ok(())
}

pub async fn logs<E: Executor>(
    manager: &ComposeManager<E>,
    service: Option<&ServiceName>,
    options: LogOptions,
    output: &Output,
) -> Result<()> {
    output.progress(&format!(
        "Fetching logs in {} environment...",
        manager.environment()
    ));
    let text = manager.logs(service, options).await?;
    output.captured(&text);
    Ok(())
}
