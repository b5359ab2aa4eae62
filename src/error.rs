//! Error types for the documentation cache
//!
//! Provides unified error handling using thiserror. Soft cache outcomes
//! (miss, expired, corrupt) are not errors; see [`crate::cache::Lookup`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the documentation cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Identifier or query cannot be turned into a cache key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Write attempted with no document body
    #[error("No documentation provided")]
    EmptyDocument,

    /// Filesystem failure while writing or sweeping
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True for errors caused by the caller rather than the store.
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, CacheError::InvalidKey(_) | CacheError::EmptyDocument)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = if self.is_invocation_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the documentation cache.
pub type Result<T> = std::result::Result<T, CacheError>;
