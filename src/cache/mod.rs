//! Cache Module
//!
//! Cache-aside plumbing: a minimal key/value capability with interchangeable
//! backends, and the entity-level cache that knows key layout and TTLs.

mod disabled;
mod entity;
mod entry;
mod kv;
mod memory;
mod redis;
mod stats;

// Re-export public types
pub use disabled::DisabledStore;
pub use entity::{
    inventory_key, product_key, product_list_key, CacheTtls, EntityCache, PRODUCT_LIST_PATTERN,
};
pub use entry::CacheEntry;
pub use kv::{CacheError, CacheResult, KeyValueStore};
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use stats::{CacheStats, StatsSnapshot};

// == Public Constants ==
/// Keys matched per SCAN round trip during pattern deletes
pub const SCAN_BATCH_SIZE: usize = 100;
