//! In-memory catalog store.
//!
//! Same contract as the MySQL store, kept in process. Read calls are counted
//! so callers can observe whether a request reached the store at all.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::catalog::now;
use crate::models::{Inventory, NewProduct, Product};
use crate::store::{CatalogStore, ProductPage, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    inventory: BTreeMap<i64, Inventory>,
    next_product_id: i64,
    next_inventory_id: i64,
}

/// Catalog store backed by ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
    reads: AtomicUsize,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read operations served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of inventory rows referencing `product_id`.
    pub async fn inventory_rows_for(&self, product_id: i64) -> usize {
        self.tables
            .read()
            .await
            .inventory
            .values()
            .filter(|inv| inv.product_id == product_id)
            .count()
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.record_read();
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn get_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        self.record_read();
        let tables = self.tables.read().await;
        Ok(tables.products.values().find(|p| p.sku == sku).cloned())
    }

    async fn list_products(&self, offset: u64, limit: u32) -> StoreResult<ProductPage> {
        self.record_read();
        let tables = self.tables.read().await;
        let total = tables.products.len() as i64;
        let products = tables
            .products
            .values()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ProductPage { products, total })
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.sku == product.sku) {
            return Err(StoreError::Conflict(format!(
                "product with SKU {} already exists",
                product.sku
            )));
        }

        tables.next_product_id += 1;
        let row = Product {
            product_id: tables.next_product_id,
            sku: product.sku,
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: now(),
        };
        tables.products.insert(row.product_id, row.clone());
        Ok(row)
    }

    async fn update_product(&self, product: &Product) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&product.product_id) {
            Some(row) => {
                row.name = product.name.clone();
                row.description = product.description.clone();
                row.price = product.price;
                Ok(row.clone())
            }
            None => Err(StoreError::NotFound("product".to_string())),
        }
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("product".to_string())),
        }
    }

    async fn get_inventory(&self, product_id: i64) -> StoreResult<Option<Inventory>> {
        self.record_read();
        let tables = self.tables.read().await;
        Ok(tables
            .inventory
            .values()
            .find(|inv| inv.product_id == product_id)
            .cloned())
    }

    async fn create_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        let mut tables = self.tables.write().await;
        tables.next_inventory_id += 1;
        let row = Inventory {
            inventory_id: tables.next_inventory_id,
            updated_at: now(),
            ..inventory.clone()
        };
        tables.inventory.insert(row.inventory_id, row.clone());
        Ok(row)
    }

    async fn update_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        let mut tables = self.tables.write().await;
        match tables.inventory.get_mut(&inventory.inventory_id) {
            Some(row) => {
                *row = Inventory {
                    updated_at: now(),
                    ..inventory.clone()
                };
                Ok(row.clone())
            }
            None => Err(StoreError::NotFound("inventory".to_string())),
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
