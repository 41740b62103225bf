//! Engine error kinds surfaced to request handlers
//!
//! Handlers map these to transport-level responses; the engines never retry
//! and never swallow a failure.

use crate::core_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No or invalid caller identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Event, request, or friendship absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the required role (not creator, not member, banned)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Event is at capacity
    #[error("Event is full")]
    Capacity,

    /// Duplicate state, e.g. already friends
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transient store failure; handlers report these as server errors
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
