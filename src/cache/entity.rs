//! Entity Cache
//!
//! Translates entity-level reads, writes and evictions into key/value calls
//! with per-kind key layout and TTL. Snapshots are stored as JSON.
//!
//! Key layout:
//! - `product:{id}` (single product, default 5 minutes)
//! - `products:list:{page}:{page_size}` (list page, 2 minutes)
//! - `inventory:{product_id}` (inventory row, 3 minutes)

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheResult, CacheStats, KeyValueStore, StatsSnapshot};
use crate::models::{InventoryResponse, ProductListResponse, ProductResponse};

/// Glob matching every list-page key
pub const PRODUCT_LIST_PATTERN: &str = "products:list:*";

pub fn product_key(id: i64) -> String {
    format!("product:{}", id)
}

pub fn product_list_key(page: u32, page_size: u32) -> String {
    format!("products:list:{}:{}", page, page_size)
}

pub fn inventory_key(product_id: i64) -> String {
    format!("inventory:{}", product_id)
}

/// TTL policy per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub product: Duration,
    /// Shorter than `product`: any create or delete shifts page contents.
    pub product_list: Duration,
    pub inventory: Duration,
}

impl CacheTtls {
    /// Default policy with a custom single-product TTL.
    pub fn with_product_ttl(product: Duration) -> Self {
        Self {
            product,
            ..Self::default()
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            product: Duration::from_secs(5 * 60),
            product_list: Duration::from_secs(2 * 60),
            inventory: Duration::from_secs(3 * 60),
        }
    }
}

/// Cache-aside helper for products, product list pages and inventory.
///
/// Cheap to clone; clones share the backend and the counters.
#[derive(Clone)]
pub struct EntityCache {
    kv: Arc<dyn KeyValueStore>,
    ttls: CacheTtls,
    stats: Arc<CacheStats>,
}

impl EntityCache {
    pub fn new(kv: Arc<dyn KeyValueStore>, ttls: CacheTtls) -> Self {
        Self {
            kv,
            ttls,
            stats: Arc::new(CacheStats::new()),
        }
    }

    pub fn available(&self) -> bool {
        self.kv.available()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Products ==

    pub async fn get_product(&self, id: i64) -> CacheResult<Option<ProductResponse>> {
        self.fetch(&product_key(id)).await
    }

    pub async fn put_product(&self, product: &ProductResponse) -> CacheResult<()> {
        self.store(&product_key(product.product_id), product, self.ttls.product)
            .await
    }

    pub async fn evict_product(&self, id: i64) -> CacheResult<()> {
        self.evict(product_key(id)).await
    }

    // == Product Lists ==

    pub async fn get_product_list(
        &self,
        page: u32,
        page_size: u32,
    ) -> CacheResult<Option<ProductListResponse>> {
        self.fetch(&product_list_key(page, page_size)).await
    }

    pub async fn put_product_list(&self, list: &ProductListResponse) -> CacheResult<()> {
        let key = product_list_key(list.page, list.page_size);
        self.store(&key, list, self.ttls.product_list).await
    }

    /// Drops every cached list page. Must follow any product create, update
    /// or delete, since page contents and totals may all have shifted.
    pub async fn evict_all_product_lists(&self) -> CacheResult<usize> {
        let result = self.kv.delete_pattern(PRODUCT_LIST_PATTERN).await;
        match &result {
            Ok(removed) => debug!(removed, "evicted product list pages"),
            Err(_) => self.stats.record_fault(),
        }
        result
    }

    // == Inventory ==

    pub async fn get_inventory(&self, product_id: i64) -> CacheResult<Option<InventoryResponse>> {
        self.fetch(&inventory_key(product_id)).await
    }

    pub async fn put_inventory(&self, inventory: &InventoryResponse) -> CacheResult<()> {
        self.store(
            &inventory_key(inventory.product_id),
            inventory,
            self.ttls.inventory,
        )
        .await
    }

    pub async fn evict_inventory(&self, product_id: i64) -> CacheResult<()> {
        self.evict(inventory_key(product_id)).await
    }

    // == Helpers ==

    /// Absence and expiry both come back as `Ok(None)`; a payload that does
    /// not decode is an error, not a miss.
    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let raw = match self.kv.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.record_fault();
                return Err(e);
            }
        };

        match raw {
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    self.stats.record_hit();
                    debug!(key, "cache hit");
                    Ok(Some(value))
                }
                Err(e) => {
                    self.stats.record_fault();
                    Err(e.into())
                }
            },
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                Ok(None)
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()> {
        let result = match serde_json::to_string(value) {
            Ok(payload) => self.kv.set(key, payload, ttl).await,
            Err(e) => Err(e.into()),
        };
        if result.is_err() {
            self.stats.record_fault();
        }
        result
    }

    async fn evict(&self, key: String) -> CacheResult<()> {
        let result = self.kv.delete(&[key]).await;
        if result.is_err() {
            self.stats.record_fault();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, DisabledStore, MemoryStore};
    use crate::models::catalog::now;
    use rust_decimal::Decimal;

    fn product(id: i64) -> ProductResponse {
        ProductResponse {
            product_id: id,
            sku: format!("SKU-{}", id),
            name: "Widget".to_string(),
            description: String::new(),
            price: Decimal::new(999, 2),
            created_at: now(),
        }
    }

    fn cache_with(kv: Arc<MemoryStore>) -> EntityCache {
        EntityCache::new(kv, CacheTtls::default())
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(product_key(42), "product:42");
        assert_eq!(product_list_key(2, 25), "products:list:2:25");
        assert_eq!(inventory_key(42), "inventory:42");
    }

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.product, Duration::from_secs(300));
        assert_eq!(ttls.product_list, Duration::from_secs(120));
        assert_eq!(ttls.inventory, Duration::from_secs(180));
        assert_eq!(
            CacheTtls::with_product_ttl(Duration::from_secs(60)).product_list,
            Duration::from_secs(120)
        );
    }

    #[tokio::test]
    async fn test_product_put_get_evict() {
        let cache = cache_with(Arc::new(MemoryStore::new(100)));
        let p = product(1);

        assert!(cache.get_product(1).await.unwrap().is_none());
        cache.put_product(&p).await.unwrap();
        assert_eq!(cache.get_product(1).await.unwrap(), Some(p));

        cache.evict_product(1).await.unwrap();
        assert!(cache.get_product(1).await.unwrap().is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_evict_all_product_lists_keeps_single_entries() {
        let kv = Arc::new(MemoryStore::new(100));
        let cache = cache_with(kv.clone());
        for page in 1..=3 {
            let list = ProductListResponse {
                products: vec![product(page as i64)],
                total: 3,
                page,
                page_size: 1,
            };
            cache.put_product_list(&list).await.unwrap();
        }
        cache.put_product(&product(1)).await.unwrap();

        assert_eq!(cache.evict_all_product_lists().await.unwrap(), 3);
        assert!(cache.get_product_list(1, 1).await.unwrap().is_none());
        assert!(cache.get_product(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_error_not_miss() {
        let kv = Arc::new(MemoryStore::new(100));
        kv.set("product:5", "not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = cache_with(kv);

        let result = cache.get_product(5).await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
        assert_eq!(cache.stats().faults, 1);
    }

    #[tokio::test]
    async fn test_disabled_backend_always_misses() {
        let cache = EntityCache::new(Arc::new(DisabledStore::new()), CacheTtls::default());
        cache.put_product(&product(1)).await.unwrap();
        assert!(cache.get_product(1).await.unwrap().is_none());
        assert_eq!(cache.evict_all_product_lists().await.unwrap(), 0);
        assert!(!cache.available());
    }
}
