//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use std::time::Duration;

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{
    create_product_handler, delete_product_handler, get_inventory_handler, get_product_handler,
    health_handler, list_products_handler, stats_handler, update_inventory_handler,
    update_product_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /cache/stats` - Entity cache counters
/// - `GET /products` / `POST /products`
/// - `GET|PUT|DELETE /products/:id`
/// - `GET|PUT /products/:id/inventory`
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
/// - Timeout: Aborts any request that outlives `request_timeout`; dropping
///   the handler future cancels in-flight store and cache calls
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/:id",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route(
            "/products/:id/inventory",
            get(get_inventory_handler).put(update_inventory_handler),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
