//! Expiration Sweep Task
//!
//! Background task that periodically purges expired TTL cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::TtlShared;

/// Spawns the background task that periodically removes expired entries.
///
/// The task ticks at the fixed `interval` and runs one purge pass per tick.
/// It stops when `shutdown` flips to `true` (via `TtlCache::close`) or when
/// the sender side is dropped (every cache handle gone); either way the
/// signal is observed at the select point, not at the next scheduled
/// wakeup, so shutdown is prompt.
///
/// # Arguments
/// * `shared` - state shared with the cache handles
/// * `interval` - fixed delay between purge passes
/// * `shutdown` - stop signal from `TtlCache::close`
pub(crate) fn spawn_sweep_task<T>(
    shared: Arc<TtlShared<T>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "expiration sweep task started");

        // First tick fires one full interval from now, not immediately
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = shared.sweep_expired();
                    if removed > 0 {
                        info!(removed, "expiration sweep removed entries");
                    } else {
                        debug!("expiration sweep found no expired entries");
                    }
                }
            }
        }

        debug!("expiration sweep task stopped");
    })
}
