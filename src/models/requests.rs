//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.
//! Validation happens here, before anything reaches the service layer.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Inventory, NewProduct, Product};

/// Default page size when the query omits it or supplies an out-of-range value
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Decimal places kept for prices (DECIMAL(10, 2) column)
const PRICE_SCALE: u32 = 2;

/// Largest price a DECIMAL(10, 2) column holds: 99999999.99
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, PRICE_SCALE);

/// Checks a price after rounding to the stored scale.
fn price_error(price: Decimal) -> Option<String> {
    let stored = price.round_dp(PRICE_SCALE);
    if stored <= Decimal::ZERO {
        return Some("price must be greater than 0".to_string());
    }
    if stored > MAX_PRICE {
        return Some(format!("price must not exceed {}", MAX_PRICE));
    }
    None
}

/// Request body for POST /products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreateRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl ProductCreateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.sku.trim().is_empty() {
            return Some("sku is required".to_string());
        }
        if self.name.trim().is_empty() {
            return Some("name is required".to_string());
        }
        price_error(self.price)
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            sku: self.sku,
            name: self.name,
            description: self.description,
            price: self.price.round_dp(PRICE_SCALE),
        }
    }
}

/// Request body for PUT /products/:id
///
/// Field-level patch: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

impl ProductUpdateRequest {
    pub fn validate(&self) -> Option<String> {
        self.price.and_then(price_error)
    }

    /// Copies every present field onto `product`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price.round_dp(PRICE_SCALE);
        }
    }
}

/// Request body for PUT /products/:id/inventory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryUpdateRequest {
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub warehouse_location: Option<String>,
}

impl InventoryUpdateRequest {
    pub fn validate(&self) -> Option<String> {
        match self.stock_quantity {
            Some(qty) if qty < 0 => Some("stock_quantity must be non-negative".to_string()),
            _ => None,
        }
    }

    pub fn apply_to(&self, inventory: &mut Inventory) {
        if let Some(qty) = self.stock_quantity {
            inventory.stock_quantity = qty;
        }
        if let Some(location) = &self.warehouse_location {
            inventory.warehouse_location = location.clone();
        }
    }
}

/// Query string for GET /products
///
/// Values are kept as raw strings so that garbage falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ListQuery {
    /// Returns `(page, page_size)` with page >= 1 and page_size in [1, 100].
    pub fn clamped(&self) -> (u32, u32) {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1);
        let page_size = self
            .page_size
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE as i64);

        let page = if page < 1 { 1 } else { page.min(u32::MAX as i64) as u32 };
        let page_size = if (1..=MAX_PAGE_SIZE as i64).contains(&page_size) {
            page_size as u32
        } else {
            DEFAULT_PAGE_SIZE
        };
        (page, page_size)
    }
}
