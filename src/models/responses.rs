//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies. Product, list and
//! inventory responses are also what the entity cache stores, so they are
//! deserializable as well.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Inventory, Product};

/// Response body for a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            created_at: product.created_at,
        }
    }
}

/// Response body for GET /products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    /// Full row count, independent of the page
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Response body for inventory endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub inventory_id: i64,
    pub product_id: i64,
    pub stock_quantity: i32,
    pub warehouse_location: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Inventory> for InventoryResponse {
    fn from(inventory: &Inventory) -> Self {
        Self {
            inventory_id: inventory.inventory_id,
            product_id: inventory.product_id,
            stock_quantity: inventory.stock_quantity,
            warehouse_location: inventory.warehouse_location.clone(),
            updated_at: inventory.updated_at,
        }
    }
}

/// Response body for the cache stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    /// Cache operations that failed and were absorbed
    pub faults: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether a real cache backend is configured
    pub cache_enabled: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_enabled: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_enabled,
        }
    }
}
