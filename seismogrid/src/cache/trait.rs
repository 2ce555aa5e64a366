//! Cache trait definition.
//!
//! The buffer shared across grid cells is addressed through this trait,
//! so computations never depend on which backend holds their values: an
//! in-process map, a memcached server, or nothing at all.

use std::time::Duration;

use super::stats::CacheStats;
use super::types::CacheError;

/// A keyed byte store shared across grid-cell computations.
///
/// Keys are non-empty strings; values are opaque byte blobs that callers
/// serialize themselves. `get` on an absent key is `Ok(None)`, never an
/// error. Implementations tolerate concurrent use; no ordering or
/// atomicity holds between distinct keys.
pub trait Cache: Send + Sync {
    /// Stores a value under a key, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Stores a value that expires after `ttl`.
    fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Retrieves the value stored under a key, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Removes every entry.
    fn flush(&self) -> Result<(), CacheError>;

    /// Returns a snapshot of the backend's counters.
    fn stats(&self) -> CacheStats;

    /// Returns the backend name for logging.
    fn backend(&self) -> &str;
}

/// A cache that stores nothing.
///
/// Every `get` misses and every `set` is accepted and dropped. Useful
/// for wiring tests and for running chains without memoization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl NoOpCache {
    /// Creates a new no-op cache.
    pub fn new() -> Self {
        Self
    }
}

impl Cache for NoOpCache {
    fn set(&self, key: &str, _value: &[u8]) -> Result<(), CacheError> {
        super::types::validate_key(key)
    }

    fn set_with_ttl(&self, key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        super::types::validate_key(key)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        super::types::validate_key(key)?;
        Ok(None)
    }

    fn flush(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new()
    }

    fn backend(&self) -> &str {
        "noop"
    }
}
