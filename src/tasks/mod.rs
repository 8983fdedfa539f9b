//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Expiration sweep: physically removes expired TTL cache entries at a
//!   fixed interval and fires eviction callbacks

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
