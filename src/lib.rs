//! kvcache - In-memory caching primitives
//!
//! Two independent, thread-safe caching strategies for typed values under
//! string keys:
//!
//! - [`TtlCache`]: unbounded map with per-entry time-to-live, expired
//!   entries filtered on read and purged by a background sweep task
//! - [`LruCache`]: fixed-capacity map with O(1) Least-Recently-Used
//!   eviction over an index-linked recency list
//!
//! Both caches hand out owned copies of stored values, never references
//! into their internal state.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Entry, Expiration, LruCache, StatsSnapshot, TtlCache, TtlCacheBuilder};
pub use config::Config;
pub use error::{CacheError, Result};
