//! Catalog store
//!
//! Persistence port for products and inventory, independent of any cache.
//! Point lookups return `Ok(None)` for absent rows: absence is normal
//! control flow, not a fault.

mod memory;
mod mysql;

pub use memory::InMemoryCatalogStore;
pub use mysql::MySqlCatalogStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Inventory, NewProduct, Product};

/// Catalog store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutation matched zero rows
    #[error("{0} not found")]
    NotFound(String),

    /// Unique index violation (duplicate SKU)
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One page of products plus the full row count.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
}

/// Repository for products and their inventory rows.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Get a product by ID.
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;

    /// Get a product by SKU.
    async fn get_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>>;

    /// List products ordered by ID. `total` is counted separately from the
    /// page fetch so it stays exact on a partial last page.
    async fn list_products(&self, offset: u64, limit: u32) -> StoreResult<ProductPage>;

    /// Insert a product, assigning its ID and creation timestamp.
    async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// Persist every mutable column of `product` (last writer wins).
    async fn update_product(&self, product: &Product) -> StoreResult<Product>;

    /// Delete a product. Returns `StoreError::NotFound` when nothing was deleted.
    async fn delete_product(&self, id: i64) -> StoreResult<()>;

    /// Get the inventory row for a product.
    async fn get_inventory(&self, product_id: i64) -> StoreResult<Option<Inventory>>;

    /// Insert an inventory row, assigning its ID and refreshing `updated_at`.
    async fn create_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory>;

    /// Persist an existing inventory row, refreshing `updated_at`.
    async fn update_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> StoreResult<()>;
}
