//! Cache Entry Module
//!
//! Defines the structure for individual TTL cache entries and the
//! expiration policy passed to `set`.

use std::time::{Duration, Instant};

// == Expiration Policy ==
/// Expiration policy for a single `set` call on a [`TtlCache`].
///
/// [`TtlCache`]: crate::cache::TtlCache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the cache's configured default TTL.
    #[default]
    Default,
    /// The entry never expires.
    Never,
    /// The entry expires after the given duration. A zero duration is
    /// treated the same as [`Expiration::Never`].
    After(Duration),
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

// == Cache Entry ==
/// A single TTL cache entry: a value plus an optional absolute deadline.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// The stored value
    pub value: T,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now, or never for `None`
    /// or a zero duration.
    pub fn new(value: T, ttl: Option<Duration>) -> Self {
        let expires_at = match ttl {
            Some(ttl) if ttl > Duration::ZERO => Some(Instant::now() + ttl),
            _ => None,
        };
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry's deadline has passed at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` is greater than
    /// or equal to the deadline, so an entry whose TTL has fully elapsed is
    /// never observable again. Entries without a deadline never expire.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    // == Time Remaining ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
