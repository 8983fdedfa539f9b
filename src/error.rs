//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
///
/// Regular cache operations never fail: a missing or expired key is a normal
/// negative result (`None` / `false`), not an error. The only failures are
/// degenerate construction parameters, which are rejected eagerly instead of
/// producing undefined behavior at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// LRU capacity must be a positive item count
    #[error("capacity must be greater than 0")]
    ZeroCapacity,

    /// Sweep interval must be a positive duration
    #[error("sweep interval must be greater than 0")]
    ZeroSweepInterval,
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
