//! In-memory document store
//!
//! Schemas and records live in DashMaps keyed by type name, so lookups for
//! different types never contend. Records of one type share a shard holding
//! an FxHashMap by id.
//!
//! # Thread Safety
//!
//! All operations are thread-safe:
//! - get_schema() / get_record(): read lock on one DashMap shard
//! - put_record() / delete_record(): only lock the target type's shard
//!
//! The store hands out clones of records, so a query never observes a record
//! changing underneath it.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use schemapath_core::{Connection, NotFoundError, Record, Result, SchemaDoc, Value};
use tracing::debug;

/// Records of one type, keyed by id
#[derive(Debug, Default)]
pub struct TypeShard {
    records: FxHashMap<String, Record>,
}

impl TypeShard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of records in this shard
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Concurrent in-memory backend implementing [`Connection`]
///
/// # Example
///
/// ```
/// use schemapath_core::{Connection, Record};
/// use schemapath_storage::MemoryStore;
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store
///     .put_schema("user", &json!({ "properties": { "name": { "type": "string" } } }))
///     .unwrap();
/// store.put_record(Record::new("user", "u1", "1", json!({ "name": "Ada" })));
///
/// assert_eq!(store.get_record("user", "u1").unwrap().data["name"], "Ada");
/// assert_eq!(store.list_ids("user").unwrap(), vec!["u1"]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: DashMap<String, Arc<SchemaDoc>>,
    shards: DashMap<String, TypeShard>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store the schema of `data_type`, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns a schema error if the definition does not parse; the store is
    /// left unchanged.
    pub fn put_schema(&self, data_type: &str, raw: &Value) -> Result<Arc<SchemaDoc>> {
        let doc = SchemaDoc::new(raw, data_type, None)?;
        Ok(self.put_schema_doc(doc))
    }

    /// Store an already parsed schema under its id
    pub fn put_schema_doc(&self, doc: SchemaDoc) -> Arc<SchemaDoc> {
        let doc = Arc::new(doc);
        debug!(target: "schemapath::storage", data_type = %doc.id(), "schema stored");
        self.schemas.insert(doc.id().to_string(), Arc::clone(&doc));
        doc
    }

    /// Store a record, returning the one it replaced
    pub fn put_record(&self, record: Record) -> Option<Record> {
        self.shards
            .entry(record.data_type.clone())
            .or_default()
            .records
            .insert(record.id.clone(), record)
    }

    /// Remove a record
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such record exists.
    pub fn delete_record(&self, data_type: &str, id: &str) -> Result<Record> {
        let removed = self
            .shards
            .get_mut(data_type)
            .and_then(|mut shard| shard.records.remove(id));
        removed.ok_or_else(|| NotFoundError::record(data_type, id).into())
    }

    /// Ids of all records of a type, sorted
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the type has neither a schema nor records.
    pub fn list_ids(&self, data_type: &str) -> Result<Vec<String>> {
        let mut ids = match self.shards.get(data_type) {
            Some(shard) => shard.records.keys().cloned().collect::<Vec<_>>(),
            None if self.schemas.contains_key(data_type) => Vec::new(),
            None => return Err(NotFoundError::schema(data_type).into()),
        };
        ids.sort();
        Ok(ids)
    }

    /// Declared schema types, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        types.sort();
        types
    }

    /// Number of declared schemas
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Number of stored records across all types
    pub fn record_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }
}

impl Connection for MemoryStore {
    fn get_schema(&self, data_type: &str) -> Result<Arc<SchemaDoc>> {
        self.schemas
            .get(data_type)
            .map(|doc| Arc::clone(doc.value()))
            .ok_or_else(|| NotFoundError::schema(data_type).into())
    }

    fn get_record(&self, data_type: &str, id: &str) -> Result<Record> {
        self.shards
            .get(data_type)
            .and_then(|shard| shard.records.get(id).cloned())
            .ok_or_else(|| NotFoundError::record(data_type, id).into())
    }
}
