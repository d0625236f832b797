//! Core traits for storage abstraction
//!
//! The resolution engine never touches storage directly. Everything it reads
//! comes through [`Connection`], so any backend that can hand out schemas and
//! records by key can serve queries.

use std::sync::Arc;

use crate::error::Result;
use crate::record::Record;
use crate::schema::SchemaDoc;

/// Read access to schemas and records
///
/// Thread safety: queries may run concurrently against one connection, so
/// implementations must be safe to call from multiple threads
/// (requires Send + Sync).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use schemapath_core::{Connection, NotFoundError, Record, Result, SchemaDoc};
///
/// struct Empty;
///
/// impl Connection for Empty {
///     fn get_schema(&self, data_type: &str) -> Result<Arc<SchemaDoc>> {
///         Err(NotFoundError::schema(data_type).into())
///     }
///
///     fn get_record(&self, data_type: &str, id: &str) -> Result<Record> {
///         Err(NotFoundError::record(data_type, id).into())
///     }
/// }
///
/// assert!(Empty.get_schema("any").unwrap_err().is_not_found());
/// ```
pub trait Connection: Send + Sync {
    /// Get the schema of a type
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Schema`](crate::NotFoundError::Schema) when the
    /// type is not declared, or a backend error.
    fn get_schema(&self, data_type: &str) -> Result<Arc<SchemaDoc>>;

    /// Get one record
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Record`](crate::NotFoundError::Record) when no
    /// such record exists, or a backend error.
    fn get_record(&self, data_type: &str, id: &str) -> Result<Record>;
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn get_schema(&self, data_type: &str) -> Result<Arc<SchemaDoc>> {
        (**self).get_schema(data_type)
    }

    fn get_record(&self, data_type: &str, id: &str) -> Result<Record> {
        (**self).get_record(data_type, id)
    }
}

impl<C: Connection + ?Sized> Connection for &C {
    fn get_schema(&self, data_type: &str) -> Result<Arc<SchemaDoc>> {
        (**self).get_schema(data_type)
    }

    fn get_record(&self, data_type: &str, id: &str) -> Result<Record> {
        (**self).get_record(data_type, id)
    }
}
