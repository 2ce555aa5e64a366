//! Cache module
//!
//! The shared buffer backing cross-cell memoization and result
//! persistence. All access goes through the [`Cache`] trait; backends
//! are interchangeable and callers must not depend on which one is in
//! use.

mod memcached;
mod memory;
mod stats;
mod r#trait;
mod types;

pub use memcached::MemcachedCache;
pub use memory::MemoryCache;
pub use r#trait::{Cache, NoOpCache};
pub use stats::CacheStats;
pub use types::{validate_key, CacheError, MemcachedConfig, MAX_KEY_LEN};
