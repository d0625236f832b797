//! schemapath - schema-driven path resolution across records
//!
//! Records are JSON documents typed by a named schema. A query such as
//! `user/u1/address/city` or `order/o7/items[2]/product/name` is resolved by
//! walking the schema and the data together, following cross-type
//! references from one record into another.
//!
//! # Quick Start
//!
//! ```
//! use schemapath::{resolve, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::from_json_str(
//!     r#"{
//!         "user": {"properties": {
//!             "name": {"type": "string"},
//!             "team": {"type": "string", "contentMediaType": "inventory/team"}
//!         }},
//!         "team": {"properties": {"title": {"type": "string"}}}
//!     }"#,
//!     r#"{
//!         "user": {"u1": {"__id": "u1", "__type": "user", "__ver": "1",
//!                         "data": {"name": "Ada", "team": "t1"}}},
//!         "team": {"t1": {"__id": "t1", "__type": "team", "__ver": "1",
//!                         "data": {"title": "Engines"}}}
//!     }"#,
//! )?;
//!
//! assert_eq!(resolve(&store, "user/u1/team/title")?, json!("Engines"));
//! # Ok::<(), schemapath::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `schemapath-core`: schema model, record envelope, path syntax, errors
//!   and the [`Connection`] trait
//! - `schemapath-engine`: [`PathNode`] and [`Query`], the resolution walk
//! - `schemapath-storage`: [`MemoryStore`], a concurrent in-memory
//!   [`Connection`] loaded from JSON documents

pub use schemapath_core::*;
pub use schemapath_engine::{create_query, resolve, NodeScope, PathNode, Query, RecordRef};
pub use schemapath_storage::{MemoryStore, StoreConfig, TypeShard, CONFIG_FILE_NAME};
