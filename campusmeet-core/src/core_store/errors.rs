//! Error types for the store subsystem

use thiserror::Error;

/// Errors that can occur in the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O or query failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Document body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection pool exhausted or unavailable
    #[error("Connection pool error: {0}")]
    Pool(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Pool(err.to_string())
    }
}
