//! Core types and traits for schemapath
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type hierarchy (schema, record, path, not-found)
//! - Path grammar: Segment, parse_path, split_path
//! - SchemaDoc: Parsed type definitions with `$ref` and cross-type references
//! - Record: Stored record envelope
//! - Connection: The read-only fetch capability the engine runs against

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod path;
pub mod record;
pub mod schema;
pub mod traits;
pub mod value;

pub use error::{
    Error, ErrorKind, NotFoundError, PathError, PathErrorReason, RecordError, Result,
    SchemaError, SchemaErrorReason,
};
pub use path::{parse_path, split_path, PathParseError, Segment};
pub use record::Record;
pub use schema::{
    Definitions, PropertyKind, PropertySchema, PropertyShape, SchemaDoc, SchemaScope,
};
pub use traits::Connection;
pub use value::Value;
