//! Catalog Cache - product catalog service with a cache-aside layer
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Open the catalog store (connection pool)
//! 4. Open the cache backend, degrading to a disabled cache on failure
//! 5. Create Axum router with all endpoints
//! 6. Serve until SIGINT/SIGTERM, then release the store pool

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::api::{create_router, AppState};
use catalog_cache::cache::{CacheTtls, DisabledStore, KeyValueStore, MemoryStore, RedisStore};
use catalog_cache::config::{CacheBackend, Config, StoreBackend};
use catalog_cache::store::{CatalogStore, InMemoryCatalogStore, MySqlCatalogStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalog Cache service");

    let config = Config::from_env();
    info!(
        environment = %config.environment,
        port = config.server_port,
        store = ?config.store_backend,
        cache = ?config.cache_backend,
        cache_ttl_secs = config.cache_ttl,
        "Configuration loaded"
    );

    // The MySQL handle is kept separately so the pool can be closed on exit
    let mysql = match config.store_backend {
        StoreBackend::MySql => Some(Arc::new(
            MySqlCatalogStore::connect(&config)
                .await
                .context("failed to connect to database")?,
        )),
        StoreBackend::Memory => None,
    };
    let store: Arc<dyn CatalogStore> = match &mysql {
        Some(mysql) => mysql.clone(),
        None => {
            warn!("Using in-memory catalog store; data is lost on exit");
            Arc::new(InMemoryCatalogStore::new())
        }
    };

    let kv = open_cache(&config).await;
    let state = AppState::from_parts(store, kv, CacheTtls::with_product_ttl(config.cache_ttl()));

    let app = create_router(state, config.request_timeout());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(mysql) = mysql {
        mysql.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the cache backend. A cache that cannot be reached is not fatal:
/// the service runs with the cache disabled.
async fn open_cache(config: &Config) -> Arc<dyn KeyValueStore> {
    match config.cache_backend {
        CacheBackend::None => {
            info!("Cache disabled by configuration");
            Arc::new(DisabledStore::new())
        }
        CacheBackend::Memory => {
            info!(max_entries = config.cache_max_entries, "Using in-process cache");
            Arc::new(MemoryStore::new(config.cache_max_entries))
        }
        CacheBackend::Redis => match config.redis_connection_info() {
            None => {
                info!("REDIS_ENDPOINT not set, cache disabled");
                Arc::new(DisabledStore::new())
            }
            Some(info) => match RedisStore::connect(info, config.redis_timeout()).await {
                Ok(store) => {
                    info!(endpoint = %config.redis_endpoint, port = config.redis_port, "Redis cache ready");
                    Arc::new(store)
                }
                Err(e) => {
                    warn!(endpoint = %config.redis_endpoint, error = %e, "Redis unreachable, cache disabled");
                    Arc::new(DisabledStore::new())
                }
            },
        },
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
