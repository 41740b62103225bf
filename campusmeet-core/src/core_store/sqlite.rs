//! SQLite-backed document store
//!
//! One `documents` table keyed by (collection, id) with JSON bodies. Field
//! mutations run as read-modify-write inside a single transaction, which
//! gives each document the per-document atomicity the engines rely on.

use super::document::{
    array_add_field, array_remove_field, increment_field, merge_fields, Fields, Filter, OrderBy,
};
use super::errors::{StoreError, StoreResult};
use super::{migrations, DocumentStore};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager).map_err(|e| StoreError::Pool(e.to_string()))?;
        Self::with_pool(pool)
    }

    /// Create an in-memory store (for testing)
    ///
    /// Capped to one connection: each pooled `:memory:` connection would
    /// otherwise see its own private database.
    pub fn memory() -> StoreResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: Pool<SqliteConnectionManager>) -> StoreResult<Self> {
        migrations::migrate(&pool)?;
        Ok(Self { pool })
    }

    fn conn(&self) -> StoreResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }

    fn read_fields(conn: &Connection, path: &str, id: &str) -> StoreResult<Option<Fields>> {
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ? AND id = ?",
                params![path, id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(map) => Ok(Some(map)),
                _ => Err(StoreError::Serialization(format!(
                    "document {path}/{id} is not a JSON object"
                ))),
            },
            None => Ok(None),
        }
    }

    fn write_fields(conn: &Connection, path: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let body = serde_json::to_string(fields)?;
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)
             ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
            params![path, id, body],
        )?;
        Ok(())
    }

    /// Read-modify-write a single document inside one transaction
    fn mutate(&self, path: &str, id: &str, apply: impl FnOnce(&mut Fields)) -> StoreResult<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut fields = Self::read_fields(&tx, path, id)?.unwrap_or_default();
        apply(&mut fields);
        Self::write_fields(&tx, path, id, &fields)?;
        tx.commit()?;
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &str, id: &str) -> StoreResult<Option<Fields>> {
        let conn = self.conn()?;
        Self::read_fields(&conn, path, id)
    }

    fn set_merge(&self, path: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.mutate(path, id, |doc| merge_fields(doc, fields))
    }

    fn delete(&self, path: &str, id: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ? AND id = ?",
            params![path, id],
        )?;
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
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, body FROM documents WHERE collection = ?")?;
        let raw_rows = stmt.query_map(params![path], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut rows = Vec::new();
        for raw in raw_rows {
            let (id, body) = raw?;
            let fields = match serde_json::from_str::<Value>(&body)? {
                Value::Object(map) => map,
                _ => {
                    return Err(StoreError::Serialization(format!(
                        "document {path}/{id} is not a JSON object"
                    )))
                }
            };
            if filter.matches(&fields) {
                rows.push((id, fields));
            }
        }

        if let Some(order) = order_by {
            rows.sort_by(|(_, a), (_, b)| order.compare(a, b));
        }
        Ok(rows)
    }
}
