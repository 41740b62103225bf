/*
    core_store - document persistence seam

    The engine's only view of persistence: an abstract key/collection store
    with per-document atomic operations. Collection paths are slash-joined
    strings ("users/{uid}/friends"), ids are strings, bodies are JSON field
    maps.

    Each operation is atomic against other operations on the *same* document.
    There are no multi-document transactions; sequences composed by the
    engines (capacity check + member add, dual friendship writes) are not
    atomic across documents, by design.
*/

pub mod document;
pub mod errors;
pub mod memory;
mod migrations;
pub mod sqlite;

pub use document::{from_fields, to_fields, Direction, Fields, Filter, OrderBy};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{StoreBackend, StoreConfig};
use serde_json::Value;
use std::sync::Arc;

/// Abstract document store consumed by the engines
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if absent
    fn get(&self, path: &str, id: &str) -> StoreResult<Option<Fields>>;

    /// Create or update a document, merging top-level fields
    fn set_merge(&self, path: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Delete a document; deleting an absent document is a no-op
    fn delete(&self, path: &str, id: &str) -> StoreResult<()>;

    /// Add a value to an array field with set semantics, creating the
    /// document if needed
    fn array_add(&self, path: &str, id: &str, field: &str, value: Value) -> StoreResult<()>;

    /// Remove a value from an array field; idempotent
    fn array_remove(&self, path: &str, id: &str, field: &str, value: Value) -> StoreResult<()>;

    /// Add `delta` to a numeric field, treating a missing field as zero
    fn increment(&self, path: &str, id: &str, field: &str, delta: i64) -> StoreResult<()>;

    /// Return `(id, fields)` pairs for documents in a collection matching
    /// `filter`, optionally sorted
    fn query(
        &self,
        path: &str,
        filter: &Filter,
        order_by: Option<&OrderBy>,
    ) -> StoreResult<Vec<(String, Fields)>>;
}

/// Open the store backend named by the configuration
pub fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&config.db_path)?)),
    }
}
