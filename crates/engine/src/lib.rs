//! Path resolution engine for schemapath
//!
//! This crate walks query paths across records:
//! - PathNode: One step of a resolution, linked to its predecessor
//! - Query: Builds the starting node and folds segments over it
//!
//! The engine holds no state between queries and performs no caching.
//! Everything it reads comes through a [`Connection`](schemapath_core::Connection),
//! one schema/record fetch pair for the starting record plus one per
//! cross-type reference followed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod node;
pub mod query;

pub use node::{NodeScope, PathNode, RecordRef};
pub use query::{create_query, resolve, Query};
