//! Catalog rows
//!
//! The relational rows are the single source of truth; everything cached is
//! derived from these.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A product row. `product_id`, `sku` and `created_at` never change after insert.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a product; the store assigns the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// Stock record for a product. At most one per product in practice.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Inventory {
    pub inventory_id: i64,
    pub product_id: i64,
    pub stock_quantity: i32,
    pub warehouse_location: String,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    /// Unsaved inventory row with default stock and location.
    ///
    /// `inventory_id` is zero until the store assigns one.
    pub fn seed(product_id: i64) -> Self {
        Self {
            inventory_id: 0,
            product_id,
            stock_quantity: 0,
            warehouse_location: String::new(),
            updated_at: now(),
        }
    }
}

/// Current time at the precision the store keeps (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
