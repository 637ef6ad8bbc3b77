//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

/// Which relational store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// Which key/value cache sits in front of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "none" | "disabled" => Ok(CacheBackend::None),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name
    pub environment: String,
    /// HTTP server port
    pub server_port: u16,
    /// Whole-request timeout in seconds
    pub request_timeout: u64,

    pub store_backend: StoreBackend,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    /// Upper bound on pooled store connections
    pub db_max_connections: u32,
    /// Idle connections the pool keeps warm
    pub db_min_idle: u32,

    pub cache_backend: CacheBackend,
    /// Redis host; empty disables the cache
    pub redis_endpoint: String,
    pub redis_port: u16,
    pub redis_password: String,
    /// Per-command cache timeout in milliseconds
    pub redis_timeout_ms: u64,
    /// TTL in seconds for single-entity reads
    pub cache_ttl: u64,
    /// Capacity of the in-process cache backend
    pub cache_max_entries: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ENVIRONMENT` - Deployment name (default: dev)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `STORE_BACKEND` - `mysql` or `memory` (default: mysql)
    /// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 100)
    /// - `DB_MIN_IDLE` - Idle connections kept open (default: 10)
    /// - `CACHE_BACKEND` - `redis`, `memory` or `none` (default: redis)
    /// - `REDIS_ENDPOINT`, `REDIS_PORT`, `REDIS_PASSWORD`
    /// - `REDIS_TIMEOUT_MS` - Per-command timeout (default: 3000)
    /// - `CACHE_TTL` - Single-entity TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - In-process cache capacity (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: env_string("ENVIRONMENT", &defaults.environment),
            server_port: env_parse("SERVER_PORT", defaults.server_port),
            request_timeout: env_parse("REQUEST_TIMEOUT", defaults.request_timeout),
            store_backend: env_parse("STORE_BACKEND", defaults.store_backend),
            db_host: env_string("DB_HOST", &defaults.db_host),
            db_port: env_parse("DB_PORT", defaults.db_port),
            db_name: env_string("DB_NAME", &defaults.db_name),
            db_user: env_string("DB_USER", &defaults.db_user),
            db_password: env_string("DB_PASSWORD", &defaults.db_password),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            db_min_idle: env_parse("DB_MIN_IDLE", defaults.db_min_idle),
            cache_backend: env_parse("CACHE_BACKEND", defaults.cache_backend),
            redis_endpoint: env_string("REDIS_ENDPOINT", &defaults.redis_endpoint),
            redis_port: env_parse("REDIS_PORT", defaults.redis_port),
            redis_password: env_string("REDIS_PASSWORD", &defaults.redis_password),
            redis_timeout_ms: env_parse("REDIS_TIMEOUT_MS", defaults.redis_timeout_ms),
            cache_ttl: env_parse("CACHE_TTL", defaults.cache_ttl),
            cache_max_entries: env_parse("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
        }
    }

    /// Redis connection settings, or `None` when no endpoint is configured.
    ///
    /// Built field by field so a password is never parsed as part of a URL.
    pub fn redis_connection_info(&self) -> Option<ConnectionInfo> {
        if self.redis_endpoint.is_empty() {
            return None;
        }
        let password = Some(self.redis_password.clone()).filter(|p| !p.is_empty());
        Some(ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.redis_endpoint.clone(), self.redis_port),
            redis: RedisConnectionInfo {
                db: 0,
                password,
                ..RedisConnectionInfo::default()
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            server_port: 8080,
            request_timeout: 30,
            store_backend: StoreBackend::MySql,
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_name: "ecommerce".to_string(),
            db_user: "root".to_string(),
            db_password: "password".to_string(),
            db_max_connections: 100,
            db_min_idle: 10,
            cache_backend: CacheBackend::Redis,
            redis_endpoint: String::new(),
            redis_port: 6379,
            redis_password: String::new(),
            redis_timeout_ms: 3000,
            cache_ttl: 300,
            cache_max_entries: 10_000,
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
