//! Error types for the entity cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::entity::Snowflake;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the entity cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store for this entity kind was disabled by configuration
    #[error("Cache deactivated: {0}")]
    Deactivated(&'static str),

    /// The store is active but holds no entity with this id
    #[error("Entity not found: {0}")]
    NotFound(Snowflake),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Deactivated(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the entity cache.
pub type Result<T> = std::result::Result<T, CacheError>;
