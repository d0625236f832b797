//! Stored records
//!
//! A record is an envelope around an arbitrary payload:
//!
//! ```json
//! {
//!     "__id": "testId01",
//!     "__type": "testSch01",
//!     "__ver": "0.0.1",
//!     "data": { "testAttr01": "testValue01" }
//! }
//! ```
//!
//! Loading checks the envelope only. The payload is not validated against a
//! schema here; shape mismatches surface segment by segment while a path is
//! walked.

use crate::error::RecordError;
use crate::value::{kind_name, Map, Value};
use serde::Serialize;

/// Envelope field holding the record id
pub const KEY_ID: &str = "__id";
/// Envelope field holding the record type
pub const KEY_TYPE: &str = "__type";
/// Envelope field holding the version tag
pub const KEY_VERSION: &str = "__ver";
/// Envelope field holding the payload
pub const KEY_DATA: &str = "data";

/// One stored record of a declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Identifier, unique within the type
    #[serde(rename = "__id")]
    pub id: String,
    /// Owning schema's type name
    #[serde(rename = "__type")]
    pub data_type: String,
    /// Free-form version tag; advisory only
    #[serde(rename = "__ver")]
    pub version: String,
    /// Payload
    pub data: Value,
}

impl Record {
    /// Create a record of `data_type` with id `id`
    ///
    /// Arguments follow address order, `{type}/{id}`.
    pub fn new(
        data_type: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        data: Value,
    ) -> Self {
        Record {
            id: id.into(),
            data_type: data_type.into(),
            version: version.into(),
            data,
        }
    }

    /// Parse a raw stored document
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the document is not an object, or if
    /// `__id`, `__type`, `__ver` or `data` is absent, or if one of the
    /// metadata fields is not a string.
    pub fn load_map(raw: &Value) -> Result<Self, RecordError> {
        let obj = raw.as_object().ok_or(RecordError::NotAnObject {
            found: kind_name(raw),
        })?;
        let data = obj
            .get(KEY_DATA)
            .ok_or(RecordError::MissingField(KEY_DATA))?;

        Ok(Record {
            id: metadata(obj, KEY_ID)?,
            data_type: metadata(obj, KEY_TYPE)?,
            version: metadata(obj, KEY_VERSION)?,
            data: data.clone(),
        })
    }

    /// `{type}/{id}` of this record
    pub fn address(&self) -> String {
        format!("{}/{}", self.data_type, self.id)
    }

    /// Serialize back into the stored document shape
    pub fn to_value(&self) -> Value {
        // String fields and a `Value` payload always serialize.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl TryFrom<&Value> for Record {
    type Error = RecordError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        Record::load_map(raw)
    }
}

fn metadata(obj: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    match obj.get(field) {
        None => Err(RecordError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecordError::InvalidField {
            field,
            found: kind_name(other),
        }),
    }
}
