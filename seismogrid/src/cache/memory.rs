//! In-process cache backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use super::r#trait::Cache;
use super::stats::CacheStats;
use super::types::{validate_key, CacheError};

struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

struct MemoryInner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// In-process map backend.
///
/// Entries live until flushed or, when stored with a TTL, until their
/// deadline passes; expired entries read as absent. A single mutex
/// guards the map, which matches the engine's coarse concurrency model:
/// workers only contend when they touch the buffer.
pub struct MemoryCache {
    inner: Mutex<MemoryInner>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            }),
        }
    }

    /// Number of live entries, expired ones included until they are
    /// read or flushed.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned mutex means a panic mid-operation; the map itself
        // stays structurally sound, so keep serving.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn store(&self, key: &str, value: &[u8], expires_at: Option<Instant>) -> Result<(), CacheError> {
        validate_key(key)?;
        let mut inner = self.lock();
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                data: value.to_vec(),
                expires_at,
            },
        );
        inner.stats.record_set();
        Ok(())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for MemoryCache {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.store(key, value, None)
    }

    fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.store(key, value, Some(Instant::now() + ttl))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        validate_key(key)?;
        let now = Instant::now();
        let mut inner = self.lock();

        let (data, expired) = match inner.entries.get(key) {
            Some(entry) if entry.is_expired(now) => (None, true),
            Some(entry) => (Some(entry.data.clone()), false),
            None => (None, false),
        };

        if expired {
            debug!(key, "evicting expired cache entry");
            inner.entries.remove(key);
        }

        match data {
            Some(data) => {
                inner.stats.record_hit();
                Ok(Some(data))
            }
            None => {
                inner.stats.record_miss();
                Ok(None)
            }
        }
    }

    fn flush(&self) -> Result<(), CacheError> {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats.record_flush();
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
