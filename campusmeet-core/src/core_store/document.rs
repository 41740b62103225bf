//! Document representation, field mutations, and query descriptors
//!
//! A document is a flat map of named JSON fields. The field-level mutation
//! helpers here define the semantics shared by every backend: array fields
//! behave as sets, numeric increments treat a missing field as zero.

use super::errors::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A stored document: named JSON fields
pub type Fields = Map<String, Value>;

/// Serialize a domain value into document fields
pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

/// Deserialize document fields into a domain value
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Merge `incoming` into `doc`, replacing top-level fields
pub(crate) fn merge_fields(doc: &mut Fields, incoming: Fields) {
    for (key, value) in incoming {
        doc.insert(key, value);
    }
}

/// Add `value` to an array field with set semantics; creates the field
/// (and replaces a non-array value) if needed
pub(crate) fn array_add_field(doc: &mut Fields, field: &str, value: Value) {
    match doc.get_mut(field) {
        Some(Value::Array(items)) => {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        _ => {
            doc.insert(field.to_string(), Value::Array(vec![value]));
        }
    }
}

/// Remove every occurrence of `value` from an array field; idempotent
pub(crate) fn array_remove_field(doc: &mut Fields, field: &str, value: &Value) {
    if let Some(Value::Array(items)) = doc.get_mut(field) {
        items.retain(|item| item != value);
    }
}

/// Add `delta` to a numeric field, treating a missing field as zero
pub(crate) fn increment_field(doc: &mut Fields, field: &str, delta: i64) {
    let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
    doc.insert(field.to_string(), Value::from(current + delta));
}

/// Filter for [`DocumentStore::query`](super::DocumentStore::query)
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection
    All,
    /// Field equals the given value
    Eq { field: String, value: Value },
    /// Array field contains the given value
    ArrayContains { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: &str, value: Value) -> Self {
        Filter::Eq {
            field: field.to_string(),
            value,
        }
    }

    pub fn array_contains(field: &str, value: Value) -> Self {
        Filter::ArrayContains {
            field: field.to_string(),
            value,
        }
    }

    /// Whether a document's fields satisfy this filter
    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => fields.get(field) == Some(value),
            Filter::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .map(|items| items.contains(value))
                .unwrap_or(false),
        }
    }
}

/// Sort direction for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering descriptor for query results
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        OrderBy {
            field: field.to_string(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: &str) -> Self {
        OrderBy {
            field: field.to_string(),
            direction: Direction::Descending,
        }
    }

    /// Compare two documents by the ordering field; documents missing the
    /// field sort before documents that have it
    pub fn compare(&self, a: &Fields, b: &Fields) -> Ordering {
        let ord = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        // mixed or non-orderable types keep their relative position
        _ => Ordering::Equal,
    }
}
