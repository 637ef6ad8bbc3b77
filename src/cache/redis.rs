//! Redis cache backend
//!
//! Wraps a multiplexed `ConnectionManager`. Every command is bounded by a
//! timeout so a slow cache can never hold a request hostage; timeouts and
//! transport errors come back as `CacheError`, never as a miss.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ConnectionInfo, RedisError};
use tracing::{debug, info};

use crate::cache::{CacheError, CacheResult, KeyValueStore, SCAN_BATCH_SIZE};

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Network cache backed by Redis.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    /// Connects and verifies the server answers `PING` within `timeout`.
    pub async fn connect(info: ConnectionInfo, timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(info)?;
        let conn = with_timeout(timeout, client.get_connection_manager()).await?;

        let store = Self { conn, timeout };
        store.ping().await?;
        info!(timeout_ms = timeout.as_millis() as u64, "connected to redis");
        Ok(store)
    }

    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: String = with_timeout(self.timeout, redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }
}

async fn with_timeout<T, F>(timeout: Duration, fut: F) -> CacheResult<T>
where
    F: Future<Output = Result<T, RedisError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout(timeout)),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        with_timeout(self.timeout, conn.get(key)).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        with_timeout(self.timeout, conn.set_ex::<_, _, ()>(key, value, seconds)).await
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        with_timeout(self.timeout, conn.del::<_, ()>(keys)).await
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<usize> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = with_timeout(
                self.timeout,
                redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH_SIZE)
                    .query_async(&mut conn),
            )
            .await?;

            if !keys.is_empty() {
                let deleted: usize = with_timeout(self.timeout, conn.del(&keys)).await?;
                removed += deleted;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern, removed, "pattern delete finished");
        Ok(removed)
    }

    fn available(&self) -> bool {
        true
    }
}
