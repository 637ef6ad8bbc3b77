//! Error types for the catalog service
//!
//! Provides the caller-facing error taxonomy using thiserror. Cache faults
//! never appear here: they are absorbed inside the service layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

// == Catalog Error Enum ==
/// Unified error type returned by the catalog service and HTTP handlers.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Entity absent ("product not found", "inventory not found")
    #[error("{0} not found")]
    NotFound(String),

    /// SKU uniqueness violation on create
    #[error("{0}")]
    Conflict(String),

    /// Malformed or out-of-range input, rejected before the service runs
    #[error("{0}")]
    Validation(String),

    /// Connectivity or query failure against the relational store
    #[error("store error: {0}")]
    Store(String),
}

impl CatalogError {
    pub fn product_not_found() -> Self {
        CatalogError::NotFound("product".to_string())
    }

    pub fn inventory_not_found() -> Self {
        CatalogError::NotFound("inventory".to_string())
    }
}

// == Store Error Conversion ==
impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => CatalogError::NotFound(entity),
            StoreError::Conflict(msg) => CatalogError::Conflict(msg),
            StoreError::Database(e) => CatalogError::Store(e.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Store(_) => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            CatalogError::product_not_found().to_string(),
            "product not found"
        );
        assert_eq!(
            CatalogError::inventory_not_found().to_string(),
            "inventory not found"
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: CatalogError = StoreError::NotFound("product".to_string()).into();
        assert!(matches!(err, CatalogError::NotFound(ref e) if e == "product"));
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: CatalogError = StoreError::Conflict("duplicate sku".to_string()).into();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CatalogError::product_not_found(), StatusCode::NOT_FOUND),
            (CatalogError::Conflict("x".into()), StatusCode::CONFLICT),
            (CatalogError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::Store("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
