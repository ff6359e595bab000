//! Data store error types

use thiserror::Error;

/// Result type for data store and search engine round trips
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a data store or search engine collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Table (or search index) is not registered
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Order direction is neither `asc` nor `desc`
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),

    /// Backend failure reported by the collaborator
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the error was caused by request input rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::InvalidSortDirection(_))
    }
}
