//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint. Handlers parse and
//! validate input, then delegate to the catalog service.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::{CacheTtls, EntityCache, KeyValueStore};
use crate::error::{CatalogError, Result};
use crate::models::{
    HealthResponse, InventoryResponse, InventoryUpdateRequest, ListQuery, ProductCreateRequest,
    ProductListResponse, ProductResponse, ProductUpdateRequest, StatsResponse,
};
use crate::service::CatalogService;
use crate::store::CatalogStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Wires a store and a key/value backend into a service.
    pub fn from_parts(
        store: Arc<dyn CatalogStore>,
        kv: Arc<dyn KeyValueStore>,
        ttls: CacheTtls,
    ) -> Self {
        Self::new(CatalogService::new(store, EntityCache::new(kv, ttls)))
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| CatalogError::Validation("invalid product ID".to_string()))
}

/// Handler for GET /products
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let (page, page_size) = query.clamped();
    let list = state.catalog.list_products(page, page_size).await?;
    Ok(Json(list))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;
    Ok(Json(state.catalog.get_product(id).await?))
}

/// Handler for POST /products
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(req): Json<ProductCreateRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::Validation(error_msg));
    }

    let product = state.catalog.create_product(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for PUT /products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductUpdateRequest>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::Validation(error_msg));
    }

    Ok(Json(state.catalog.update_product(id, &req).await?))
}

/// Handler for DELETE /products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /products/:id/inventory
pub async fn get_inventory_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InventoryResponse>> {
    let id = parse_id(&id)?;
    Ok(Json(state.catalog.get_inventory(id).await?))
}

/// Handler for PUT /products/:id/inventory
pub async fn update_inventory_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InventoryUpdateRequest>,
) -> Result<Json<InventoryResponse>> {
    let id = parse_id(&id)?;
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::Validation(error_msg));
    }

    Ok(Json(state.catalog.update_inventory(id, &req).await?))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.catalog.cache_stats();
    Json(StatsResponse {
        hits: stats.hits,
        misses: stats.misses,
        faults: stats.faults,
        hit_rate: stats.hit_rate(),
    })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    state.catalog.health_check().await?;
    Ok(Json(HealthResponse::healthy(state.catalog.cache_enabled())))
}
