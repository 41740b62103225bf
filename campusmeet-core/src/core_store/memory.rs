//! In-memory document store
//!
//! Backs unit and scenario tests. A single lock over the document map gives
//! every operation the same per-document atomicity contract as the durable
//! backend.

use super::document::{
    array_add_field, array_remove_field, increment_field, merge_fields, Fields, Filter, OrderBy,
};
use super::errors::{StoreError, StoreResult};
use super::DocumentStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Helper to convert poison errors into StoreError
fn handle_poison<T>(_err: PoisonError<T>) -> StoreError {
    StoreError::Backend("lock poisoned: a thread panicked while holding the lock".to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Fields>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate(&self, path: &str, id: &str, apply: impl FnOnce(&mut Fields)) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(handle_poison)?;
        let doc = documents
            .entry((path.to_string(), id.to_string()))
            .or_default();
        apply(doc);
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str, id: &str) -> StoreResult<Option<Fields>> {
        let documents = self.documents.read().map_err(handle_poison)?;
        Ok(documents
            .get(&(path.to_string(), id.to_string()))
            .cloned())
    }

    fn set_merge(&self, path: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.mutate(path, id, |doc| merge_fields(doc, fields))
    }

    fn delete(&self, path: &str, id: &str) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(handle_poison)?;
        documents.remove(&(path.to_string(), id.to_string()));
        Ok(())
    }

    fn array_add(&self, path: &str, id: &str, field: &str, value: Value) -> StoreResult<()> {
        self.mutate(path, id, |doc| array_add_field(doc, field, value))
    }

    fn array_remove(&self, path: &str, id: &str, field: &str, value: Value) -> StoreResult<()> {
        self.mutate(path, id, |doc| array_remove_field(doc, field, &value))
    }

    fn increment(&self, path: &str, id: &str, field: &str, delta: i64) -> StoreResult<()> {
        self.mutate(path, id, |doc| increment_field(doc, field, delta))
    }

    fn query(
        &self,
        path: &str,
        filter: &Filter,
        order_by: Option<&OrderBy>,
    ) -> StoreResult<Vec<(String, Fields)>> {
        let documents = self.documents.read().map_err(handle_poison)?;
        let mut rows: Vec<(String, Fields)> = documents
            .iter()
            .filter(|((collection, _), fields)| collection == path && filter.matches(fields))
            .map(|((_, id), fields)| (id.clone(), fields.clone()))
            .collect();
        if let Some(order) = order_by {
            rows.sort_by(|(_, a), (_, b)| order.compare(a, b));
        }
        Ok(rows)
    }
}
