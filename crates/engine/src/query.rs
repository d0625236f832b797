//! Query orchestration
//!
//! A [`Query`] resolves `{id}/{path...}` against a starting type: it builds
//! the starting [`PathNode`] and consumes segments until the path is
//! exhausted or a segment fails. There are no partial results; the first
//! failure is returned as is.
//!
//! # Examples
//!
//! ```
//! use schemapath_engine::resolve;
//! use schemapath_storage::MemoryStore;
//! use serde_json::json;
//!
//! let store = MemoryStore::from_json_str(
//!     r#"{"testSch01": {"properties": {"testAttr01": {"type": "string"}}}}"#,
//!     r#"{"testSch01": {"testId01": {
//!         "__id": "testId01", "__type": "testSch01", "__ver": "0.0.1",
//!         "data": {"testAttr01": "testValue01"}
//!     }}}"#,
//! ).unwrap();
//!
//! let value = resolve(&store, "testSch01/testId01/testAttr01").unwrap();
//! assert_eq!(value, json!("testValue01"));
//! ```

use std::sync::Arc;

use schemapath_core::path::{join_path, split_path, PATH_SEPARATOR};
use schemapath_core::{
    Connection, PathError, PathErrorReason, PathParseError, Result, Value,
};
use tracing::debug;

use crate::node::PathNode;

/// A path resolution bound to a connection
#[derive(Debug)]
pub struct Query<'c, C: Connection + ?Sized> {
    conn: &'c C,
    data_type: String,
    id: String,
    path: String,
}

/// Create a query for `path` (`{id}/{nested/path}`) under `start_type`
///
/// # Errors
///
/// Returns a syntax [`PathError`] if the type or the id is empty, or if the
/// segment after the id is.
pub fn create_query<'c, C: Connection + ?Sized>(
    conn: &'c C,
    start_type: &str,
    path: &str,
) -> Result<Query<'c, C>> {
    if start_type.is_empty() {
        return Err(empty_segment("").into());
    }
    let (id, rest) = split_path(path);
    if id.is_empty() {
        return Err(empty_segment(start_type).into());
    }
    if rest.starts_with(PATH_SEPARATOR) {
        return Err(empty_segment(&join_path(start_type, id)).into());
    }
    Ok(Query {
        conn,
        data_type: start_type.to_string(),
        id: id.to_string(),
        path: rest.to_string(),
    })
}

/// Resolve a full `{type}/{id}/{path...}` expression to its value
pub fn resolve<C: Connection + ?Sized>(conn: &C, path: &str) -> Result<Value> {
    let (data_type, rest) = split_path(path);
    if rest.starts_with(PATH_SEPARATOR) {
        return Err(empty_segment(data_type).into());
    }
    create_query(conn, data_type, rest)?.walk_value()
}

impl<'c, C: Connection + ?Sized> Query<'c, C> {
    /// Starting type
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Starting record id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path below the starting record
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Walk the path and return the final node
    ///
    /// The node's [`chain`](PathNode::chain) records every step taken.
    pub fn walk(&self) -> Result<Arc<PathNode>> {
        debug!(
            target: "schemapath::query",
            data_type = %self.data_type,
            id = %self.id,
            path = %self.path,
            "walking query"
        );
        let mut node = PathNode::new(self.conn, &self.data_type, &self.id, &self.path, None, None)
            .map_err(|e| {
                debug!(target: "schemapath::query", error = %e, "query failed");
                e
            })?;
        while !node.is_done() {
            node = node.consume(self.conn).map_err(|e| {
                debug!(target: "schemapath::query", error = %e, "query failed");
                e
            })?;
        }
        debug!(
            target: "schemapath::query",
            hops = node.hops(),
            record = %node.record(),
            "query resolved"
        );
        Ok(node)
    }

    /// Walk the path and return the resolved value
    pub fn walk_value(&self) -> Result<Value> {
        Ok(self.walk()?.value().clone())
    }
}

fn empty_segment(prefix: &str) -> PathError {
    PathError::new(
        prefix,
        "",
        PathErrorReason::Syntax(PathParseError::EmptySegment),
    )
}
