//! Background eviction of expired rate records.
//!
//! # Responsibilities
//! - Periodically sweep the limiter's store so idle clients do not pin memory
//! - Tie the task's lifetime to an explicit start/stop handle

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::admission::clock::Clock;
use crate::admission::rate_limiter::RateLimiter;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Handle to a running sweep task.
///
/// Call [`SweepTask::stop`] to end it and wait for it to finish. Dropping the
/// handle signals the task to stop without waiting.
pub struct SweepTask {
    shutdown: Shutdown,
    handle: Option<JoinHandle<()>>,
}

impl SweepTask {
    /// Spawn the sweep loop on the current tokio runtime.
    pub fn start(limiter: Arc<RateLimiter>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        let handle = tokio::spawn(run(limiter, clock, interval, rx));
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for it to exit.
    pub async fn stop(mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Sweep task ended abnormally");
            }
        }
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown.trigger();
        }
    }
}

async fn run(
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Rate store sweeper starting");

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() fires immediately; the first sweep is one period out
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = limiter.sweep(clock.now());
                let remaining = limiter.store().len();
                metrics::record_sweep(evicted, remaining);
                if evicted > 0 {
                    tracing::debug!(evicted, remaining, "Swept expired rate records");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Rate store sweeper received shutdown signal, exiting loop");
                break;
            }
        }
    }
}
