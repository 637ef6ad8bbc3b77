//! Null-object cache backend used when no cache endpoint is configured.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheResult, KeyValueStore};

/// Every read misses, every write and delete succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

impl DisabledStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueStore for DisabledStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _keys: &[String]) -> CacheResult<()> {
        Ok(())
    }

    async fn delete_pattern(&self, _pattern: &str) -> CacheResult<usize> {
        Ok(0)
    }

    fn available(&self) -> bool {
        false
    }
}
