// src/core/refresher.rs

//! Periodic background reload of the task file.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::state::TaskStore;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the background reload task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct RefresherHandle {
    task: JoinHandle<()>,
    interval: Duration,
}

impl RefresherHandle {
    /// The effective reload period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the reload task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the refresher. Equivalent to dropping the handle.
    pub fn stop(self) {}
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        log::debug!("Stopping background refresher");
        self.task.abort();
    }
}

/// Starts reloading `store` from its file every `interval` on `runtime`.
///
/// The first reload happens one full interval after the call. Each reload runs on
/// the blocking pool because it takes the store lock and reads the file. A failed
/// reload is logged and the previous collection is kept.
pub fn spawn(runtime: &Handle, store: TaskStore, interval: Duration) -> RefresherHandle {
    // `tokio::time::interval` rejects a zero period.
    let interval = interval.max(MIN_INTERVAL);
    log::debug!(
        "Starting background refresher for '{}' every {:?}",
        store.file().path().display(),
        interval
    );

    let task = runtime.spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let target = store.clone();
            match tokio::task::spawn_blocking(move || target.reload()).await {
                Ok(Ok(count)) => log::trace!("Refreshed {} task(s) from disk", count),
                Ok(Err(e)) => log::warn!("Background refresh failed: {}", e),
                Err(e) => log::warn!("Background refresh task failed to complete: {}", e),
            }
        }
    });

    RefresherHandle { task, interval }
}
