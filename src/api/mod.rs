//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /products` - Paged product list
//! - `POST /products` - Create a product
//! - `GET /products/:id` - Fetch a product
//! - `PUT /products/:id` - Patch a product
//! - `DELETE /products/:id` - Delete a product
//! - `GET /products/:id/inventory` - Fetch inventory
//! - `PUT /products/:id/inventory` - Patch (or create) inventory
//! - `GET /cache/stats` - Cache counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
