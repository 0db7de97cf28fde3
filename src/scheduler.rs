//! Fixed-period scheduler for finalize calls.
//!
//! `start()` fires one call immediately and then arms a ticker that fires a call
//! every period. Each call runs in its own task, so a slow call never delays the
//! next tick and overlapping calls are allowed. Missed ticks are skipped, not
//! replayed. `stop()` disarms the ticker; calls already in flight keep running
//! until they resolve or hit the client timeout.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::finalize::{FinalizeClient, Trigger};

pub struct Scheduler {
    client: FinalizeClient,
    period: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(client: FinalizeClient, period: Duration) -> Self {
        Self {
            client,
            period,
            ticker: Mutex::new(None),
        }
    }

    /// Fire the startup call and arm the repeating ticker.
    ///
    /// Must be called from within a Tokio runtime. Starting a running scheduler is a no-op.
    pub fn start(&self) {
        let mut ticker = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::warn!("Scheduler already running, ignoring start");
            return;
        }

        tracing::info!(
            url = %self.client.url(),
            period_secs = self.period.as_secs_f64(),
            "Starting finalize scheduler"
        );

        // The startup call is spawned here rather than on the ticker so that a
        // stop() right after start() still leaves exactly one call behind.
        spawn_call(self.client.clone());

        let client = self.client.clone();
        let period = self.period;
        *ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                spawn_call(client.clone());
            }
        }));
    }

    /// Disarm the ticker. Idempotent, and a no-op before `start()`.
    pub fn stop(&self) {
        let handle = self
            .ticker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            tracing::info!("Stopping finalize scheduler");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run one scheduled call in its own task so a panic stays contained to it.
fn spawn_call(client: FinalizeClient) {
    let handle = tokio::spawn(async move {
        client.call(Trigger::Scheduled).await;
    });
    tokio::spawn(async move {
        if let Err(e) = handle.await {
            if e.is_panic() {
                tracing::error!(error = %e, "Scheduled finalize call panicked");
            }
        }
    });
}
