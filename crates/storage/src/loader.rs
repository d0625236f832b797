//! Document loading
//!
//! A store is populated from two JSON documents:
//!
//! ```text
//! schemas: { "<type>": <schema definition>, ... }
//! records: { "<type>": { "<id>": <record envelope>, ... }, ... }
//! ```
//!
//! Each document is validated in full before anything is inserted, so a bad
//! entry leaves the store untouched.

use std::path::Path;

use schemapath_core::{
    Error, Record, RecordError, Result, SchemaDoc, SchemaError, SchemaErrorReason, Value,
};
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::memory::MemoryStore;

impl MemoryStore {
    /// Build a store from the two documents
    pub fn from_documents(schemas: &Value, records: &Value) -> Result<Self> {
        let store = Self::new();
        store.load_schema_document(schemas)?;
        store.load_record_document(records)?;
        Ok(store)
    }

    /// Build a store from the two documents given as JSON text
    pub fn from_json_str(schemas: &str, records: &str) -> Result<Self> {
        let schemas: Value = serde_json::from_str(schemas)?;
        let records: Value = serde_json::from_str(records)?;
        Self::from_documents(&schemas, &records)
    }

    /// Build a store from the documents named by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let schemas = read_document(&config.schemas)?;
        let records = read_document(&config.records)?;
        let store = Self::from_documents(&schemas, &records)?;
        info!(
            target: "schemapath::storage",
            schemas = store.schema_count(),
            records = store.record_count(),
            "store opened"
        );
        Ok(store)
    }

    /// Parse and store every schema of a `type -> definition` document
    ///
    /// Returns the number of schemas loaded.
    pub fn load_schema_document(&self, document: &Value) -> Result<usize> {
        let entries = document.as_object().ok_or_else(|| {
            SchemaError::new(
                "",
                SchemaErrorReason::NotAnObject {
                    found: schemapath_core::value::kind_name(document),
                },
            )
        })?;

        let docs = entries
            .iter()
            .map(|(data_type, raw)| SchemaDoc::new(raw, data_type, None))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                warn!(target: "schemapath::storage", error = %e, "schema document rejected");
                e
            })?;

        let count = docs.len();
        for doc in docs {
            self.put_schema_doc(doc);
        }
        Ok(count)
    }

    /// Store every record of a `type -> id -> envelope` document
    ///
    /// Returns the number of records loaded.
    ///
    /// # Errors
    ///
    /// Returns a record error if an envelope is malformed or declares a
    /// different `{type}/{id}` than the position it is stored under.
    pub fn load_record_document(&self, document: &Value) -> Result<usize> {
        let records = parse_record_document(document).map_err(|e| {
            warn!(target: "schemapath::storage", error = %e, "record document rejected");
            e
        })?;

        let count = records.len();
        for record in records {
            self.put_record(record);
        }
        Ok(count)
    }
}

fn parse_record_document(document: &Value) -> Result<Vec<Record>> {
    let types = document.as_object().ok_or_else(|| not_an_object(document))?;

    let mut records = Vec::new();
    for (data_type, ids) in types {
        let ids = ids.as_object().ok_or_else(|| not_an_object(ids))?;
        for (id, raw) in ids {
            let record = Record::load_map(raw)?;
            if record.data_type != *data_type || record.id != *id {
                return Err(RecordError::Misplaced {
                    expected: format!("{}/{}", data_type, id),
                    found: record.address(),
                }
                .into());
            }
            records.push(record);
        }
    }
    Ok(records)
}

fn not_an_object(value: &Value) -> Error {
    RecordError::NotAnObject {
        found: schemapath_core::value::kind_name(value),
    }
    .into()
}

fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::storage(format!("failed to read '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| Error::storage(format!("invalid JSON in '{}': {}", path.display(), e)))
}
