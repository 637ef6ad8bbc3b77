//! Product operations
//!
//! Reads go cache → store → cache. Mutations go to the store first, then
//! evict every key that could now be stale before returning. Cache faults
//! are logged and swallowed on every path; store faults abort the request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{product_key, product_list_key, EntityCache, StatsSnapshot};
use crate::error::{CatalogError, Result};
use crate::models::{
    ProductCreateRequest, ProductListResponse, ProductResponse, ProductUpdateRequest,
};
use crate::store::CatalogStore;

/// Orchestrates the catalog store and the entity cache.
///
/// Holds no request state; clone freely and share across handlers.
#[derive(Clone)]
pub struct CatalogService {
    pub(super) store: Arc<dyn CatalogStore>,
    pub(super) cache: EntityCache,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, cache: EntityCache) -> Self {
        Self { store, cache }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.available()
    }

    pub fn cache_stats(&self) -> StatsSnapshot {
        self.cache.stats()
    }

    /// Probes the store; cache health never affects the result.
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await?;
        Ok(())
    }

    // == Get Product ==
    pub async fn get_product(&self, id: i64) -> Result<ProductResponse> {
        match self.cache.get_product(id).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => debug!(key = %product_key(id), "cache miss, reading store"),
            Err(e) => warn!(key = %product_key(id), error = %e, "cache read failed, reading store"),
        }

        let product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(CatalogError::product_not_found)?;

        let response = ProductResponse::from(&product);
        if let Err(e) = self.cache.put_product(&response).await {
            warn!(key = %product_key(id), error = %e, "failed to cache product");
        }
        Ok(response)
    }

    // == List Products ==
    /// `page` and `page_size` arrive already clamped by the HTTP layer.
    pub async fn list_products(&self, page: u32, page_size: u32) -> Result<ProductListResponse> {
        let key = product_list_key(page, page_size);
        match self.cache.get_product_list(page, page_size).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => debug!(key = %key, "cache miss, reading store"),
            Err(e) => warn!(key = %key, error = %e, "cache read failed, reading store"),
        }

        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        let page_rows = self.store.list_products(offset, page_size).await?;

        let response = ProductListResponse {
            products: page_rows.products.iter().map(ProductResponse::from).collect(),
            total: page_rows.total,
            page,
            page_size,
        };
        if let Err(e) = self.cache.put_product_list(&response).await {
            warn!(key = %key, error = %e, "failed to cache product list");
        }
        Ok(response)
    }

    // == Create Product ==
    pub async fn create_product(&self, req: ProductCreateRequest) -> Result<ProductResponse> {
        if self.store.get_product_by_sku(&req.sku).await?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "product with SKU {} already exists",
                req.sku
            )));
        }

        let product = self.store.create_product(req.into_new_product()).await?;
        info!(product_id = product.product_id, sku = %product.sku, "product created");

        // Nothing is cached under the new id yet; only list pages are stale.
        self.evict_product_lists().await;
        Ok(ProductResponse::from(&product))
    }

    // == Update Product ==
    pub async fn update_product(
        &self,
        id: i64,
        req: &ProductUpdateRequest,
    ) -> Result<ProductResponse> {
        let mut product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(CatalogError::product_not_found)?;

        req.apply_to(&mut product);
        let product = self.store.update_product(&product).await?;
        info!(product_id = id, "product updated");

        self.evict_product(id).await;
        self.evict_product_lists().await;
        Ok(ProductResponse::from(&product))
    }

    // == Delete Product ==
    /// The product's inventory row is left in the store; its cached snapshot
    /// is evicted.
    pub async fn delete_product(&self, id: i64) -> Result<()> {
        self.store.delete_product(id).await?;
        info!(product_id = id, "product deleted");

        self.evict_product(id).await;
        self.evict_product_lists().await;
        self.evict_inventory(id).await;
        Ok(())
    }

    // == Eviction ==

    pub(super) async fn evict_product(&self, id: i64) {
        if let Err(e) = self.cache.evict_product(id).await {
            warn!(key = %product_key(id), error = %e, "failed to evict product");
        }
    }

    pub(super) async fn evict_product_lists(&self) {
        if let Err(e) = self.cache.evict_all_product_lists().await {
            warn!(error = %e, "failed to evict product list pages");
        }
    }
}
