//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::ExpiringCache;

/// Handle to a running sweep task.
///
/// Dropping the handle also stops the task.
#[derive(Debug)]
pub struct CleanupTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        // The task may already be gone if it panicked
        let _ = self.shutdown.send(());
        if let Err(err) = self.handle.await {
            warn!("Cleanup task ended abnormally: {}", err);
        }
    }
}

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The first sweep runs one `interval` after the call. Each sweep takes the
/// cache's write lock once for all record kinds.
///
/// # Returns
/// `None` when `interval` is zero: the sweeper is disabled and entries only
/// expire lazily on read.
pub fn spawn_cleanup_task(cache: ExpiringCache, interval: Duration) -> Option<CleanupTask> {
    if interval.is_zero() {
        info!("Cleanup interval is zero, background sweep disabled");
        return None;
    }

    let (shutdown, mut shutdown_rx) = oneshot::channel();

    // Anchor the schedule at spawn time, not at the task's first poll
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let handle = tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs_f64()
        );

        loop {
            tokio::select! {
                // Fires on an explicit shutdown and when the handle is dropped
                _ = &mut shutdown_rx => {
                    info!("Expiry sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep().await;
                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiry sweep: no expired entries found");
                    }
                }
            }
        }
    });

    Some(CleanupTask { shutdown, handle })
}
