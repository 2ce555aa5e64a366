//! Cache error and configuration types.

use std::time::Duration;

use thiserror::Error;

/// Longest key accepted by the backends (memcached protocol limit).
pub const MAX_KEY_LEN: usize = 250;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache keys must not be empty")]
    EmptyKey,

    #[error("invalid cache key {0:?} (no whitespace or control characters, at most {MAX_KEY_LEN} bytes)")]
    InvalidKey(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Validates a key against the backend contract.
///
/// Empty keys are rejected everywhere; whitespace, control characters
/// and over-long keys are rejected because the wire protocol cannot
/// carry them.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    if key.len() > MAX_KEY_LEN
        || key.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Configuration for the memcached backend.
#[derive(Debug, Clone)]
pub struct MemcachedConfig {
    /// Server address, `host:port`
    pub address: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Per-request read/write timeout
    pub io_timeout: Duration,
    /// Expiry applied to plain `set` calls; zero means no expiry
    pub default_ttl: Duration,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:11211".to_string(),
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(10),
            default_ttl: Duration::ZERO,
        }
    }
}

impl MemcachedConfig {
    /// Creates a configuration for the given server address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-request I/O timeout.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Sets the expiry applied to plain `set` calls.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}
