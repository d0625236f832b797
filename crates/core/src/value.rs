//! Record payload values
//!
//! Record data is schema-less at rest and only gains shape when walked in
//! lockstep with a [`SchemaDoc`](crate::SchemaDoc), so payloads are held as
//! plain [`serde_json::Value`] trees.

pub use serde_json::{Map, Value};

/// Name of the JSON kind of a value, for diagnostics
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
