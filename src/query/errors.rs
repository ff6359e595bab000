//! # Query Errors
//!
//! Error types raised while resolving, searching and paginating a query.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request parameter could not be parsed
    #[error("Invalid query parameter: {0}")]
    InvalidParam(String),

    /// Requested page size exceeds the configured maximum
    #[error("Per-page {0} exceeds maximum {1}")]
    LimitExceeded(usize, usize),

    // ==================
    // Declaration Errors (5xx)
    // ==================
    /// Declared data source is not a recognized shape
    #[error("Could not determine how to retrieve results: {0}")]
    Resolution(String),

    /// Unsupported combination of declaration hooks
    #[error("Not supported: {0}")]
    NotSupported(String),

    // ==================
    // Collaborator Errors
    // ==================
    /// Data store or search engine failure
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidParam(_) => StatusCode::BAD_REQUEST,
            QueryError::LimitExceeded(_, _) => StatusCode::BAD_REQUEST,

            QueryError::Store(err) if err.is_client_error() => StatusCode::BAD_REQUEST,

            QueryError::Resolution(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::NotSupported(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<QueryError> for ErrorResponse {
    fn from(err: QueryError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
