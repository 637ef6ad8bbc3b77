//! Integration Tests for the Catalog Service
//!
//! Exercises cache-aside reads and write invalidation against each cache
//! backend flavour: a working in-process cache, a disabled cache, and a
//! cache that fails every call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use catalog_cache::{
    cache::{CacheError, CacheResult, CacheTtls, DisabledStore, EntityCache, KeyValueStore, MemoryStore},
    models::{
        Inventory, InventoryUpdateRequest, NewProduct, Product, ProductCreateRequest,
        ProductUpdateRequest,
    },
    store::{CatalogStore, InMemoryCatalogStore, ProductPage, StoreResult},
    CatalogError, CatalogService,
};
use rust_decimal::Decimal;

// == Helper Functions ==

/// Backend that refuses every call, as a cache node that went away would.
struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _keys: &[String]) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete_pattern(&self, _pattern: &str) -> CacheResult<usize> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn available(&self) -> bool {
        true
    }
}

/// Store whose rows disappear between the service's read and its update,
/// as a concurrent delete would cause.
struct VanishingStore {
    inner: InMemoryCatalogStore,
}

#[async_trait]
impl CatalogStore for VanishingStore {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.inner.get_product(id).await
    }

    async fn get_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        self.inner.get_product_by_sku(sku).await
    }

    async fn list_products(&self, offset: u64, limit: u32) -> StoreResult<ProductPage> {
        self.inner.list_products(offset, limit).await
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        self.inner.create_product(product).await
    }

    async fn update_product(&self, product: &Product) -> StoreResult<Product> {
        self.inner.delete_product(product.product_id).await?;
        self.inner.update_product(product).await
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        self.inner.delete_product(id).await
    }

    async fn get_inventory(&self, product_id: i64) -> StoreResult<Option<Inventory>> {
        self.inner.get_inventory(product_id).await
    }

    async fn create_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        self.inner.create_inventory(inventory).await
    }

    async fn update_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        self.inner.update_inventory(inventory).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }
}

fn service_with(kv: Arc<dyn KeyValueStore>) -> (CatalogService, Arc<InMemoryCatalogStore>) {
    let store = Arc::new(InMemoryCatalogStore::new());
    let cache = EntityCache::new(kv, CacheTtls::default());
    (CatalogService::new(store.clone(), cache), store)
}

fn create_req(sku: &str) -> ProductCreateRequest {
    ProductCreateRequest {
        sku: sku.to_string(),
        name: "Widget".to_string(),
        description: String::new(),
        price: Decimal::new(999, 2),
    }
}

// == Cache-Aside Read Tests ==

#[tokio::test]
async fn test_missing_product_is_not_cached() {
    let kv = Arc::new(MemoryStore::new(100));
    let (svc, store) = service_with(kv.clone());

    assert!(matches!(
        svc.get_product(42).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        svc.get_product(42).await,
        Err(CatalogError::NotFound(_))
    ));

    assert!(!kv.contains("product:42").await);
    assert!(kv.is_empty().await);
    assert_eq!(store.read_count(), 2);
}

#[tokio::test]
async fn test_list_page_served_from_cache() {
    let kv = Arc::new(MemoryStore::new(100));
    let (svc, store) = service_with(kv.clone());
    svc.create_product(create_req("A")).await.unwrap();
    let reads = store.read_count();

    let first = svc.list_products(1, 10).await.unwrap();
    let second = svc.list_products(1, 10).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.read_count(), reads + 1);
    assert!(kv.contains("products:list:1:10").await);
}

// == Invalidation Tests ==

#[tokio::test]
async fn test_update_evicts_product_and_list_pages() {
    let kv = Arc::new(MemoryStore::new(100));
    let (svc, _) = service_with(kv.clone());
    let created = svc.create_product(create_req("A")).await.unwrap();
    let id = created.product_id;

    svc.get_product(id).await.unwrap();
    svc.list_products(1, 10).await.unwrap();
    svc.list_products(2, 5).await.unwrap();
    assert_eq!(kv.len().await, 3);

    let req = ProductUpdateRequest {
        name: Some("Gadget".to_string()),
        ..Default::default()
    };
    svc.update_product(id, &req).await.unwrap();

    assert!(kv.is_empty().await);
    assert_eq!(svc.get_product(id).await.unwrap().name, "Gadget");
    assert_eq!(
        svc.list_products(1, 10).await.unwrap().products[0].name,
        "Gadget"
    );
}

#[tokio::test]
async fn test_create_evicts_list_pages_only() {
    let kv = Arc::new(MemoryStore::new(100));
    let (svc, _) = service_with(kv.clone());
    let a = svc.create_product(create_req("A")).await.unwrap();

    svc.get_product(a.product_id).await.unwrap();
    assert_eq!(svc.list_products(1, 10).await.unwrap().total, 1);

    svc.create_product(create_req("B")).await.unwrap();

    assert!(kv.contains(&format!("product:{}", a.product_id)).await);
    assert!(!kv.contains("products:list:1:10").await);
    assert_eq!(svc.list_products(1, 10).await.unwrap().total, 2);
}

#[tokio::test]
async fn test_delete_evicts_product_lists_and_inventory() {
    let kv = Arc::new(MemoryStore::new(100));
    let (svc, store) = service_with(kv.clone());
    let id = svc.create_product(create_req("A")).await.unwrap().product_id;
    svc.update_inventory(
        id,
        &InventoryUpdateRequest {
            stock_quantity: Some(3),
            warehouse_location: None,
        },
    )
    .await
    .unwrap();

    svc.get_product(id).await.unwrap();
    svc.get_inventory(id).await.unwrap();
    svc.list_products(1, 10).await.unwrap();

    svc.delete_product(id).await.unwrap();

    assert!(kv.is_empty().await);
    assert!(matches!(
        svc.get_product(id).await,
        Err(CatalogError::NotFound(_))
    ));
    // Inventory rows are not cascaded
    assert_eq!(store.inventory_rows_for(id).await, 1);
}

// == Degraded Cache Tests ==

#[tokio::test]
async fn test_disabled_cache_reads_store_every_time() {
    let (svc, store) = service_with(Arc::new(DisabledStore::new()));
    let id = svc.create_product(create_req("A")).await.unwrap().product_id;
    let reads = store.read_count();

    for _ in 0..3 {
        assert_eq!(svc.get_product(id).await.unwrap().sku, "A");
    }

    assert_eq!(store.read_count(), reads + 3);
    assert!(!svc.cache_enabled());
    assert_eq!(svc.cache_stats().hits, 0);
}

#[tokio::test]
async fn test_disabled_cache_list_total_follows_creates() {
    let (svc, store) = service_with(Arc::new(DisabledStore::new()));
    for sku in ["A", "B"] {
        svc.create_product(create_req(sku)).await.unwrap();
    }

    assert_eq!(svc.list_products(1, 10).await.unwrap().total, 2);
    svc.create_product(create_req("C")).await.unwrap();

    let reads = store.read_count();
    let list = svc.list_products(1, 10).await.unwrap();
    assert_eq!(list.total, 3);
    assert_eq!(list.products.len(), 3);
    assert_eq!(store.read_count(), reads + 1);
}

#[tokio::test]
async fn test_disabled_cache_inventory_round_trip() {
    let (svc, store) = service_with(Arc::new(DisabledStore::new()));
    let id = svc.create_product(create_req("A")).await.unwrap().product_id;

    assert!(matches!(
        svc.get_inventory(id).await,
        Err(CatalogError::NotFound(ref e)) if e == "inventory"
    ));

    let req = InventoryUpdateRequest {
        stock_quantity: Some(8),
        warehouse_location: Some("Bay 2".to_string()),
    };
    let written = svc.update_inventory(id, &req).await.unwrap();
    assert_eq!(svc.get_inventory(id).await.unwrap(), written);

    let req = InventoryUpdateRequest {
        stock_quantity: Some(3),
        warehouse_location: None,
    };
    svc.update_inventory(id, &req).await.unwrap();

    let fresh = svc.get_inventory(id).await.unwrap();
    assert_eq!(fresh.stock_quantity, 3);
    assert_eq!(fresh.warehouse_location, "Bay 2");
    assert_eq!(store.inventory_rows_for(id).await, 1);
    assert_eq!(svc.cache_stats().hits, 0);
}

#[tokio::test]
async fn test_failing_cache_fails_open() {
    let (svc, store) = service_with(Arc::new(FailingStore));

    let created = svc.create_product(create_req("A")).await.unwrap();
    let id = created.product_id;

    assert_eq!(svc.get_product(id).await.unwrap(), created);
    assert_eq!(svc.list_products(1, 10).await.unwrap().total, 1);

    let req = ProductUpdateRequest {
        price: Some(Decimal::new(1250, 2)),
        ..Default::default()
    };
    let updated = svc.update_product(id, &req).await.unwrap();
    assert_eq!(updated.price, Decimal::new(1250, 2));

    let inv = svc
        .update_inventory(
            id,
            &InventoryUpdateRequest {
                stock_quantity: Some(4),
                warehouse_location: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(svc.get_inventory(id).await.unwrap(), inv);

    svc.delete_product(id).await.unwrap();
    assert!(store.read_count() > 0);

    let stats = svc.cache_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert!(stats.faults > 0);
}

#[tokio::test]
async fn test_failing_cache_still_reports_store_errors() {
    let (svc, _) = service_with(Arc::new(FailingStore));
    svc.create_product(create_req("A")).await.unwrap();

    assert!(matches!(
        svc.create_product(create_req("A")).await,
        Err(CatalogError::Conflict(_))
    ));
    assert!(matches!(
        svc.get_inventory(999).await,
        Err(CatalogError::NotFound(_))
    ));
}

// == Store Race Tests ==

#[tokio::test]
async fn test_update_of_concurrently_deleted_product_is_not_found() {
    let store = Arc::new(VanishingStore {
        inner: InMemoryCatalogStore::new(),
    });
    let cache = EntityCache::new(Arc::new(MemoryStore::new(100)), CacheTtls::default());
    let svc = CatalogService::new(store, cache);
    let id = svc.create_product(create_req("A")).await.unwrap().product_id;

    let req = ProductUpdateRequest {
        name: Some("Gadget".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        svc.update_product(id, &req).await,
        Err(CatalogError::NotFound(ref e)) if e == "product"
    ));
    assert!(matches!(
        svc.get_product(id).await,
        Err(CatalogError::NotFound(_))
    ));
}
