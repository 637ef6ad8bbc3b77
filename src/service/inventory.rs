//! Inventory operations
//!
//! Inventory is subordinate to its product: every read and write first
//! confirms the product exists in the store. That check and the following
//! inventory write are separate statements, so a product deleted in between
//! can leave an orphaned inventory row.

use tracing::{debug, info, warn};

use crate::cache::inventory_key;
use crate::error::{CatalogError, Result};
use crate::models::{Inventory, InventoryResponse, InventoryUpdateRequest};
use crate::service::CatalogService;

impl CatalogService {
    // == Get Inventory ==
    /// Never creates a row: a product without inventory is `NotFound("inventory")`.
    pub async fn get_inventory(&self, product_id: i64) -> Result<InventoryResponse> {
        self.require_product(product_id).await?;

        let key = inventory_key(product_id);
        match self.cache.get_inventory(product_id).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => debug!(key = %key, "cache miss, reading store"),
            Err(e) => warn!(key = %key, error = %e, "cache read failed, reading store"),
        }

        let inventory = self
            .store
            .get_inventory(product_id)
            .await?
            .ok_or_else(CatalogError::inventory_not_found)?;

        let response = InventoryResponse::from(&inventory);
        if let Err(e) = self.cache.put_inventory(&response).await {
            warn!(key = %key, error = %e, "failed to cache inventory");
        }
        Ok(response)
    }

    // == Update Inventory ==
    /// Applies the present fields, creating the row with defaults on first use.
    pub async fn update_inventory(
        &self,
        product_id: i64,
        req: &InventoryUpdateRequest,
    ) -> Result<InventoryResponse> {
        self.require_product(product_id).await?;

        let inventory = match self.store.get_inventory(product_id).await? {
            Some(mut existing) => {
                req.apply_to(&mut existing);
                self.store.update_inventory(&existing).await?
            }
            None => {
                let mut seeded = Inventory::seed(product_id);
                req.apply_to(&mut seeded);
                let created = self.store.create_inventory(&seeded).await?;
                info!(product_id, inventory_id = created.inventory_id, "inventory created");
                created
            }
        };

        self.evict_inventory(product_id).await;
        Ok(InventoryResponse::from(&inventory))
    }

    async fn require_product(&self, product_id: i64) -> Result<()> {
        match self.store.get_product(product_id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::product_not_found()),
        }
    }

    pub(super) async fn evict_inventory(&self, product_id: i64) {
        if let Err(e) = self.cache.evict_inventory(product_id).await {
            warn!(key = %inventory_key(product_id), error = %e, "failed to evict inventory");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::cache::{CacheTtls, EntityCache, MemoryStore};
    use crate::error::CatalogError;
    use crate::models::{InventoryUpdateRequest, ProductCreateRequest};
    use crate::service::CatalogService;
    use crate::store::InMemoryCatalogStore;

    async fn service_with_product() -> (CatalogService, Arc<InMemoryCatalogStore>, i64) {
        let store = Arc::new(InMemoryCatalogStore::new());
        let cache = EntityCache::new(Arc::new(MemoryStore::new(1000)), CacheTtls::default());
        let svc = CatalogService::new(store.clone(), cache);
        let product = svc
            .create_product(ProductCreateRequest {
                sku: "INV-1".to_string(),
                name: "Crate".to_string(),
                description: String::new(),
                price: Decimal::new(500, 2),
            })
            .await
            .unwrap();
        (svc, store, product.product_id)
    }

    #[tokio::test]
    async fn test_get_inventory_for_missing_product() {
        let (svc, _, _) = service_with_product().await;
        let result = svc.get_inventory(404).await;
        assert!(matches!(result, Err(CatalogError::NotFound(ref e)) if e == "product"));
    }

    #[tokio::test]
    async fn test_get_inventory_does_not_auto_create() {
        let (svc, store, id) = service_with_product().await;
        let result = svc.get_inventory(id).await;
        assert!(matches!(result, Err(CatalogError::NotFound(ref e)) if e == "inventory"));
        assert_eq!(store.inventory_rows_for(id).await, 0);
    }

    #[tokio::test]
    async fn test_first_update_creates_single_row_with_defaults() {
        let (svc, store, id) = service_with_product().await;
        let req = InventoryUpdateRequest {
            stock_quantity: Some(12),
            warehouse_location: None,
        };
        let inv = svc.update_inventory(id, &req).await.unwrap();

        assert_eq!(inv.stock_quantity, 12);
        assert_eq!(inv.warehouse_location, "");
        assert_eq!(store.inventory_rows_for(id).await, 1);

        svc.update_inventory(id, &req).await.unwrap();
        assert_eq!(store.inventory_rows_for(id).await, 1);
    }

    #[tokio::test]
    async fn test_update_inventory_for_missing_product() {
        let (svc, _, _) = service_with_product().await;
        let result = svc
            .update_inventory(404, &InventoryUpdateRequest::default())
            .await;
        assert!(matches!(result, Err(CatalogError::NotFound(ref e)) if e == "product"));
    }

    #[tokio::test]
    async fn test_update_evicts_cached_inventory() {
        let (svc, _, id) = service_with_product().await;
        svc.update_inventory(
            id,
            &InventoryUpdateRequest {
                stock_quantity: Some(1),
                warehouse_location: Some("A".to_string()),
            },
        )
        .await
        .unwrap();
        // populate the cache
        assert_eq!(svc.get_inventory(id).await.unwrap().stock_quantity, 1);

        svc.update_inventory(
            id,
            &InventoryUpdateRequest {
                stock_quantity: Some(7),
                warehouse_location: None,
            },
        )
        .await
        .unwrap();

        let fresh = svc.get_inventory(id).await.unwrap();
        assert_eq!(fresh.stock_quantity, 7);
        assert_eq!(fresh.warehouse_location, "A");
    }
}
