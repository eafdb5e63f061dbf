// ABOUTME: Periodic status polling as a cancellable task.
// ABOUTME: A deadline and Ctrl-C both cancel through the same MonitorHandle.

use crate::compose::ComposeManager;
use crate::error::{Error, Result};
use crate::exec::Executor;
use crate::status::StatusSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Cancels a running [`StatusMonitor`]. Clones share one flag.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl MonitorHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Cancel once `after` has elapsed.
    pub fn cancel_after(&self, after: Duration) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::debug!("monitor deadline reached");
            handle.cancel();
        })
    }

    /// Cancel on Ctrl-C. If the signal handler cannot be installed the
    /// monitor is cancelled too and the task yields the error.
    pub fn cancel_on_interrupt(&self) -> JoinHandle<std::io::Result<()>> {
        let handle = self.clone();
        tokio::spawn(async move {
            let result = tokio::signal::ctrl_c().await;
            match &result {
                Ok(()) => tracing::debug!("monitor interrupted"),
                Err(e) => tracing::error!("Could not listen for Ctrl-C: {}", e),
            }
            handle.cancel();
            result
        })
    }
}

/// Polls `ps --format json` every `interval` until cancelled.
pub struct StatusMonitor<'a, E> {
    manager: &'a ComposeManager<E>,
    interval: Duration,
    rx: watch::Receiver<bool>,
}

impl<'a, E: Executor> StatusMonitor<'a, E> {
    /// Intervals below one second are raised to one second.
    pub fn new(manager: &'a ComposeManager<E>, interval: Duration) -> (Self, MonitorHandle) {
        let (tx, rx) = watch::channel(false);
        let monitor = Self {
            manager,
            interval: interval.max(MIN_INTERVAL),
            rx,
        };
        (monitor, MonitorHandle { tx: Arc::new(tx) })
    }

    /// Run until cancelled, handing each snapshot to `on_tick`. Returns the
    /// number of ticks taken. The first tick fires immediately; ticks never
    /// overlap since each poll is awaited before the next tick.
    pub async fn run<F>(mut self, mut on_tick: F) -> u64
    where
        F: FnMut(&StatusSnapshot),
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0;

        loop {
            if *self.rx.borrow() {
                break;
            }
            tokio::select! {
                changed = self.rx.changed() => {
                    // Every handle dropped also ends the loop.
                    if changed.is_err() || *self.rx.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    let snapshot = self.manager.service_status().await;
                    on_tick(&snapshot);
                    ticks += 1;
                }
            }
        }

        tracing::info!("Monitoring stopped after {} polls", ticks);
        ticks
    }
}

/// Monitor with the configured interval until `duration` elapses or Ctrl-C.
/// Returns `None` without polling when monitoring is disabled.
pub async fn monitor_services<E, F>(
    manager: &ComposeManager<E>,
    duration: Option<Duration>,
    on_tick: F,
) -> Result<Option<u64>>
where
    E: Executor,
    F: FnMut(&StatusSnapshot),
{
    let monitoring = &manager.config().monitoring;
    if !monitoring.enabled {
        tracing::info!("Monitoring is not enabled in configuration");
        return Ok(None);
    }

    let (monitor, handle) = StatusMonitor::new(manager, monitoring.interval());
    let interrupt = handle.cancel_on_interrupt();
    let deadline = duration.map(|d| handle.cancel_after(d));

    let ticks = monitor.run(on_tick).await;

    if let Some(deadline) = deadline {
        deadline.abort();
    }
    if !interrupt.is_finished() {
        interrupt.abort();
    } else if let Ok(Err(e)) = interrupt.await {
        return Err(Error::Monitoring(format!("could not listen for Ctrl-C: {e}")));
    }
    Ok(Some(ticks))
}
