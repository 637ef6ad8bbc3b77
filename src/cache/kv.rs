//! Key/value capability
//!
//! The narrow contract the entity cache needs from a network cache: string
//! values, per-key TTL, key and pattern deletes. A backend that is not
//! configured is still a valid backend (see `DisabledStore`).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures of the cache itself. "Key absent" is not an error; `get`
/// returns `Ok(None)` for that.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport failure (connection refused, reset, protocol error)
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// Stored payload could not be encoded or decoded
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Port for key/value cache backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Removes the given keys. Missing keys are ignored.
    async fn delete(&self, keys: &[String]) -> CacheResult<()>;

    /// Removes every key matching a glob pattern (`*`, `?`).
    ///
    /// Implementations walk the keyspace incrementally and succeed when
    /// nothing matches. Returns the number of keys removed.
    async fn delete_pattern(&self, pattern: &str) -> CacheResult<usize>;

    /// Whether a real backend sits behind this store.
    fn available(&self) -> bool;
}
