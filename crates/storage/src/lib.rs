//! Storage backend for schemapath
//!
//! This crate provides the data source queries read through:
//! - MemoryStore: DashMap + FxHashMap store, sharded by type
//! - Document loading from the schema and record JSON documents
//! - StoreConfig: `schemapath.toml` naming those documents
//!
//! Lookups for different types never contend, and records are handed out
//! as clones.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod loader;
pub mod memory;

pub use config::{StoreConfig, CONFIG_FILE_NAME};
pub use memory::{MemoryStore, TypeShard};
