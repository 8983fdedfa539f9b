//! TTL Cache Module
//!
//! A mapping from string keys to typed values where every entry can carry a
//! time-to-live. Expiration is both passive (an expired entry reads as absent
//! the moment its deadline passes) and active (a background sweep task
//! periodically purges expired entries and fires the eviction callback).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::{CacheStats, Entry, EvictionCallback, Expiration, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == Shared State ==
/// State shared between cache handles and the sweep task.
///
/// A single reader/writer lock covers the whole key space: reads proceed in
/// parallel, writes and the sweep's purge pass are exclusive.
pub(crate) struct TtlShared<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    default_ttl: Option<Duration>,
    on_evict: Option<EvictionCallback<T>>,
    stats: CacheStats,
}

impl<T> TtlShared<T> {
    // == Sweep Expired ==
    /// Physically removes every entry whose deadline has passed and fires
    /// the eviction callback once per removed entry.
    ///
    /// The write lock is released before any callback runs, so callbacks
    /// cannot deadlock against the cache's own lock.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let evicted: Vec<(String, T)> = {
            let mut entries = self.entries.write();
            let expired: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(key, _)| key.clone())
                .collect();

            expired
                .into_iter()
                .filter_map(|key| {
                    entries.remove_entry(&key).map(|(key, entry)| (key, entry.value))
                })
                .collect()
        };

        let removed = evicted.len();
        self.stats.record_evictions(removed as u64);
        if let Some(on_evict) = &self.on_evict {
            for (key, value) in evicted {
                on_evict(key, value);
            }
        }
        removed
    }
}

// == TTL Cache ==
/// Thread-safe cache with per-entry time-to-live.
///
/// Built via [`TtlCache::builder`]; building spawns the background sweep
/// task and therefore must happen inside a tokio runtime. Dropping the cache
/// without calling [`TtlCache::close`] also stops the task, but only
/// `close` waits for it to finish.
pub struct TtlCache<T> {
    shared: Arc<TtlShared<T>>,
    shutdown: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<T> TtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns a builder with a 1 second sweep interval and no default TTL.
    pub fn builder() -> TtlCacheBuilder<T> {
        TtlCacheBuilder::new()
    }

    // == Set ==
    /// Stores a key-value pair, unconditionally overwriting any existing
    /// entry for that key.
    ///
    /// [`Expiration::Default`] substitutes the cache's configured default
    /// TTL; [`Expiration::Never`] and a zero duration store an entry that
    /// never expires.
    pub fn set(&self, key: impl Into<String>, value: T, expiration: Expiration) {
        let ttl = match expiration {
            Expiration::Default => self.shared.default_ttl,
            Expiration::Never => None,
            Expiration::After(ttl) => Some(ttl),
        };
        let entry = Entry::new(value, ttl);
        self.shared.entries.write().insert(key.into(), entry);
    }

    // == Get ==
    /// Retrieves a copy of the value for `key`, or `None` if the key is
    /// missing or its deadline has passed.
    ///
    /// Expiration is a logical predicate evaluated at read time: an expired
    /// entry reads as absent whether or not the sweep has purged it yet.
    /// The read never purges, so it only needs the shared lock; physical
    /// removal is left to the sweep task.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.shared.entries.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                self.shared.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.shared.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes the entry for `key` if present, returning whether anything
    /// was removed. Explicit removal never fires the eviction callback.
    pub fn delete(&self, key: &str) -> bool {
        self.shared.entries.write().remove(key).is_some()
    }

    // == Count ==
    /// Returns the number of physically stored entries.
    ///
    /// This may include expired entries the sweep has not purged yet, so it
    /// is an upper bound on the number of live entries; it matches the live
    /// count exactly once a sweep cycle completes.
    pub fn count(&self) -> usize {
        self.shared.entries.read().len()
    }

    // == Keys ==
    /// Returns the keys of all live (non-expired) entries.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.shared
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Snapshot ==
    /// Returns an owned copy of all live entries. The copy shares no state
    /// with the cache.
    pub fn snapshot(&self) -> HashMap<String, T> {
        let now = Instant::now();
        self.shared
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    // == TTL Remaining ==
    /// Returns the remaining lifetime of a live entry, or `None` if the key
    /// is missing, expired, or never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.shared
            .entries
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.time_remaining(now))
    }

    // == Flush ==
    /// Atomically replaces the backing map with an empty one. Bulk clearing
    /// is not eviction: no callbacks fire.
    pub fn flush(&self) {
        *self.shared.entries.write() = HashMap::new();
    }

    // == Stats ==
    /// Returns a point-in-time copy of the hit/miss/eviction counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    // == Close ==
    /// Signals the background sweep task to stop and waits for it to
    /// finish. After `close` returns, no sweep touches the cache's state
    /// again; entries already stored remain readable.
    ///
    /// Meant to be called once; further calls log a warning and do nothing.
    pub async fn close(&self) {
        let handle = self.sweeper.lock().take();
        match handle {
            Some(handle) => {
                let _ = self.shutdown.send(true);
                let _ = handle.await;
            }
            None => warn!("close called more than once on TtlCache"),
        }
    }
}

#[cfg(test)]
impl<T> TtlCache<T> {
    /// Takes the sweep task's join handle so tests can await termination.
    pub(crate) fn sweeper_handle_for_tests(&self) -> JoinHandle<()> {
        self.sweeper.lock().take().expect("sweeper already taken")
    }
}

// == Builder ==
/// Builder for [`TtlCache`].
pub struct TtlCacheBuilder<T> {
    default_ttl: Option<Duration>,
    sweep_interval: Duration,
    on_evict: Option<EvictionCallback<T>>,
}

impl<T> Default for TtlCacheBuilder<T> {
    fn default() -> Self {
        Self {
            default_ttl: None,
            sweep_interval: Duration::from_secs(1),
            on_evict: None,
        }
    }
}

impl<T> TtlCacheBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL substituted for [`Expiration::Default`]. A zero
    /// duration means entries stored with `Default` never expire.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = (ttl > Duration::ZERO).then_some(ttl);
        self
    }

    /// Sets the interval between background sweep passes. Fixed for the
    /// lifetime of the cache.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the callback fired once per entry removed by the sweep.
    pub fn on_evict(mut self, on_evict: impl Fn(String, T) + Send + Sync + 'static) -> Self {
        self.on_evict = Some(Box::new(on_evict));
        self
    }

    // == Build ==
    /// Validates the configuration and spawns the sweep task.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns [`CacheError::ZeroSweepInterval`] for a zero sweep interval,
    /// which would otherwise give the sweep an undefined cadence.
    pub fn build(self) -> Result<TtlCache<T>> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::ZeroSweepInterval);
        }

        let shared = Arc::new(TtlShared {
            entries: RwLock::new(HashMap::new()),
            default_ttl: self.default_ttl,
            on_evict: self.on_evict,
            stats: CacheStats::new(),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);
        let sweeper = spawn_sweep_task(Arc::clone(&shared), self.sweep_interval, shutdown_rx);

        Ok(TtlCache {
            shared,
            shutdown,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }
}
