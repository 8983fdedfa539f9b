//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod ttl;


// Re-export public types
pub use entry::{Entry, Expiration};
pub use lru::LruCache;
pub use stats::StatsSnapshot;
pub use ttl::{TtlCache, TtlCacheBuilder};

pub(crate) use stats::CacheStats;
pub(crate) use ttl::TtlShared;

// == Eviction Callback ==
/// Callback invoked with each evicted `(key, value)` pair.
///
/// Fired by the TTL cache's background sweep and by LRU capacity eviction,
/// never by explicit `delete`, `flush`, or `clear`. Callbacks run after the
/// cache's lock has been released, but they must still be non-blocking and
/// must not call back into the cache that invoked them.
pub type EvictionCallback<T> = Box<dyn Fn(String, T) + Send + Sync>;
