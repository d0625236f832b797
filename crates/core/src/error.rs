//! Error types for schemapath
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The taxonomy follows the phase in which a failure happens:
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`SchemaError`] | parsing a schema definition |
//! | [`RecordError`] | parsing a stored record envelope |
//! | [`PathError`] | consuming a query path |
//! | [`NotFoundError`] | a [`Connection`](crate::Connection) lookup |
//!
//! [`Error::kind`] classifies an error without any transport semantics; an
//! outer layer (HTTP, CLI) decides how each kind is reported.

use crate::path::PathParseError;
use thiserror::Error;

/// Result type alias for schemapath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed schema definition
    Schema,
    /// Malformed record envelope
    Record,
    /// Path could not be resolved
    Path,
    /// Unknown type or record id
    NotFound,
    /// Backend failure (I/O, document decoding)
    Storage,
}

impl ErrorKind {
    /// Stable lowercase name, suitable for logs and machine output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Schema => "schema",
            ErrorKind::Record => "record",
            ErrorKind::Path => "path",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

/// Error types for schemapath
#[derive(Debug, Error)]
pub enum Error {
    /// Schema definition failed to parse
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Record envelope failed to parse
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Path resolution failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// Type or record does not exist
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Create a storage error from any message
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(_) => ErrorKind::Schema,
            Error::Record(_) => ErrorKind::Record,
            Error::Path(_) => ErrorKind::Path,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Get the path error, if this is one
    pub fn as_path_error(&self) -> Option<&PathError> {
        match self {
            Error::Path(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(format!("invalid JSON document: {}", e))
    }
}

// =============================================================================
// SchemaError
// =============================================================================

/// A schema definition that cannot be parsed
///
/// `path` locates the failing element inside the schema, e.g.
/// `schema1.definitions.testValue.value2`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid schema at [{path}]: {reason}")]
pub struct SchemaError {
    /// Location of the offending property or definition
    pub path: String,
    /// What is wrong with it
    pub reason: SchemaErrorReason,
}

impl SchemaError {
    /// Create a schema error at the given location
    pub fn new(path: impl Into<String>, reason: SchemaErrorReason) -> Self {
        SchemaError {
            path: path.into(),
            reason,
        }
    }
}

/// Why a schema definition was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaErrorReason {
    /// Definition or property is not a JSON object
    #[error("expected an object, found {found}")]
    NotAnObject {
        /// Kind of value found instead
        found: &'static str,
    },

    /// Property has no `type` field
    #[error("missing field `type`")]
    MissingType,

    /// A known field holds the wrong kind of value
    #[error("field `{field}` must be {expected}, found {found}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Expected value kind
        expected: &'static str,
        /// Actual value kind
        found: &'static str,
    },

    /// Array or map property without an `items` shape
    #[error("{kind} property requires `items`")]
    MissingItems {
        /// Declared kind
        kind: &'static str,
    },

    /// `$ref` is not an internal definitions pointer
    #[error("unsupported $ref [{0}], expected #/definitions/{{name}}")]
    InvalidRef(String),

    /// `$ref` names a definition that does not exist
    #[error("unresolved $ref [{0}]")]
    UnresolvedRef(String),

    /// `$ref` placed on a property that is not an object
    #[error("$ref is only allowed on object properties, found {kind}")]
    RefOnNonObject {
        /// Declared kind
        kind: &'static str,
    },

    /// Cross-type reference placed on an object, array or map property
    #[error("cross-type reference is only allowed on scalar properties, found {kind}")]
    CrossRefOnNonScalar {
        /// Declared kind
        kind: &'static str,
    },

    /// Cross-type marker without a type name
    #[error("cross-type reference [{0}] does not name a type")]
    EmptyCrossRef(String),
}

// =============================================================================
// RecordError
// =============================================================================

/// A stored record whose envelope cannot be parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Document is not a JSON object
    #[error("record document must be an object, found {found}")]
    NotAnObject {
        /// Kind of value found instead
        found: &'static str,
    },

    /// Required envelope field is absent
    #[error("record is missing field `{0}`")]
    MissingField(&'static str),

    /// Envelope field is not a string
    #[error("record field `{field}` must be a string, found {found}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Kind of value found instead
        found: &'static str,
    },

    /// Envelope metadata disagrees with where the record is stored
    #[error("record [{found}] stored under [{expected}]")]
    Misplaced {
        /// `{type}/{id}` the record is stored under
        expected: String,
        /// `{type}/{id}` the envelope declares
        found: String,
    },
}

// =============================================================================
// PathError
// =============================================================================

/// Failure while resolving a query path
///
/// `prefix` is the part of the path that was consumed successfully before
/// `segment` failed, so `{prefix}/{segment}` points at the exact break.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("path [{prefix}] segment [{segment}]: {reason}")]
pub struct PathError {
    /// Path consumed before the failing segment
    pub prefix: String,
    /// The failing segment, as written
    pub segment: String,
    /// What went wrong
    pub reason: PathErrorReason,
}

impl PathError {
    /// Create a path error
    pub fn new(
        prefix: impl Into<String>,
        segment: impl Into<String>,
        reason: PathErrorReason,
    ) -> Self {
        PathError {
            prefix: prefix.into(),
            segment: segment.into(),
            reason,
        }
    }

    /// Prepend `base` to the recorded prefix
    ///
    /// Used when a path fragment was parsed on its own and the caller knows
    /// where the fragment starts in the full query.
    pub fn rebase(mut self, base: &str) -> Self {
        self.prefix = crate::path::join_path(base, &self.prefix);
        self
    }

    /// Full location of the failure: `{prefix}/{segment}`
    pub fn location(&self) -> String {
        crate::path::join_path(&self.prefix, &self.segment)
    }
}

/// Why a path segment could not be consumed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathErrorReason {
    /// Segment text is malformed
    #[error("invalid path syntax: {0}")]
    Syntax(PathParseError),

    /// Schema in scope declares no such property
    #[error("property not found")]
    PropertyNotFound,

    /// Property is declared but the record holds no value for it
    #[error("value not present")]
    ValueNotPresent,

    /// Array index past the end
    #[error("index out of range: {index} >= {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Array index is not a non-negative integer
    #[error("invalid array index [{0}]")]
    InvalidIndex(String),

    /// Map has no such key
    #[error("key not found: [{0}]")]
    KeyNotFound(String),

    /// Index supplied for a property that is neither array nor map
    #[error("{kind} property cannot be indexed")]
    NotIndexable {
        /// Declared kind
        kind: &'static str,
    },

    /// Segments remain after a scalar leaf
    #[error("cannot descend into scalar")]
    ScalarDescent,

    /// Segments remain after a whole collection was selected
    #[error("cannot descend into {kind} without an index")]
    CollectionDescent {
        /// Collection kind
        kind: &'static str,
    },

    /// Stored value does not have the shape the schema declares
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Shape the schema declares
        expected: &'static str,
        /// Shape the record holds
        found: &'static str,
    },

    /// Cross-type chain came back to a record it already visited
    #[error("cyclic reference detected: [{data_type}/{id}] already visited")]
    CyclicReference {
        /// Type of the revisited record
        data_type: String,
        /// Id of the revisited record
        id: String,
    },
}

// =============================================================================
// NotFoundError
// =============================================================================

/// Unknown type or record, reported by a [`Connection`](crate::Connection)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    /// No schema declared for the type
    #[error("schema [type]=[{0}] does not exist")]
    Schema(String),

    /// No record with this id
    #[error("record [{data_type}/{id}] does not exist")]
    Record {
        /// Record type
        data_type: String,
        /// Record id
        id: String,
    },
}

impl NotFoundError {
    /// Not-found error for a schema
    pub fn schema(data_type: impl Into<String>) -> Self {
        NotFoundError::Schema(data_type.into())
    }

    /// Not-found error for a record
    pub fn record(data_type: impl Into<String>, id: impl Into<String>) -> Self {
        NotFoundError::Record {
            data_type: data_type.into(),
            id: id.into(),
        }
    }
}
