//! Catalog models
//!
//! Domain rows persisted by the catalog store, plus the request and response
//! DTOs exchanged with the HTTP layer. Response DTOs double as the cached
//! snapshot format.

pub mod catalog;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use catalog::{Inventory, NewProduct, Product};
pub use requests::{InventoryUpdateRequest, ListQuery, ProductCreateRequest, ProductUpdateRequest};
pub use responses::{
    HealthResponse, InventoryResponse, ProductListResponse, ProductResponse, StatsResponse,
};
