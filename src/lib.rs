//! Catalog Cache - product catalog service with a cache-aside layer
//!
//! Reads go through a key/value cache and fall back to the relational store;
//! every committed write evicts the cache entries it could have made stale.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use error::CatalogError;
pub use service::CatalogService;
