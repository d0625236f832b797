//! Path nodes
//!
//! A [`PathNode`] is one step of an in-progress resolution. It holds the
//! record it is positioned in, the schema in scope, the value in scope and
//! the segments still to consume. Consuming a segment never mutates a node;
//! it produces a new node linked to its predecessor, so a finished
//! resolution leaves an append-only trace of every step.
//!
//! # Consuming a segment
//!
//! 1. Look the property up in the schema in scope.
//! 2. Apply the index, if any: a position for arrays, a key for maps.
//! 3. Dispatch on the resulting shape:
//!    - cross-type reference with segments left: jump to the referenced
//!      record and continue there with the remaining segments
//!    - object: descend with the nested schema, resolving `$ref` against
//!      the scope chain entered so far
//!    - scalar, or array/map without an index: leaf
//!
//! A jump to a record already present in the chain is rejected as a cycle.

use std::fmt;
use std::sync::Arc;

use schemapath_core::path::{array_index, join_path, parse_path};
use schemapath_core::value::kind_name;
use schemapath_core::{
    Connection, Error, PathError, PathErrorReason, PropertyKind, PropertySchema, PropertyShape,
    Result, SchemaDoc, SchemaError, SchemaErrorReason, SchemaScope, Segment, Value,
};
use tracing::{debug, trace};

/// Address of a record in the chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    /// Record type
    pub data_type: String,
    /// Record id
    pub id: String,
}

impl RecordRef {
    /// Create a record address
    pub fn new(data_type: impl Into<String>, id: impl Into<String>) -> Self {
        RecordRef {
            data_type: data_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.data_type, self.id)
    }
}

/// What a node's value can be descended into
#[derive(Debug, Clone)]
pub enum NodeScope {
    /// Object described by a schema; further segments are property names
    Object(Arc<SchemaScope>),
    /// Scalar or whole collection; nothing further can be consumed
    Leaf(PropertyKind),
}

/// One step of a path resolution
#[derive(Debug)]
pub struct PathNode {
    parent: Option<Arc<PathNode>>,
    record: Arc<RecordRef>,
    scope: NodeScope,
    value: Value,
    segment: Option<Segment>,
    consumed: String,
    segments: Arc<[Segment]>,
    position: usize,
}

/// Result of consuming one segment, before the next node is built
enum Step<'a> {
    Descend(Arc<SchemaScope>, &'a Value),
    Leaf(PropertyKind, &'a Value),
    Jump(RecordRef),
}

impl PathNode {
    /// Build the starting node of a resolution
    ///
    /// `path` is everything after `{type}/{id}`. When `schema` or `value` is
    /// `None` it is fetched through `conn`; passing both starts the walk from
    /// an already loaded record.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `path` is malformed, or whatever `conn`
    /// returns when the type or record does not exist.
    pub fn new<C: Connection + ?Sized>(
        conn: &C,
        start_type: &str,
        start_id: &str,
        path: &str,
        schema: Option<Arc<SchemaDoc>>,
        value: Option<Value>,
    ) -> Result<Arc<PathNode>> {
        let record = RecordRef::new(start_type, start_id);
        let base = record.to_string();
        let segments = parse_path(path).map_err(|e| e.rebase(&base))?;

        let schema = match schema {
            Some(schema) => schema,
            None => conn.get_schema(start_type)?,
        };
        let value = match value {
            Some(value) => value,
            None => conn.get_record(start_type, start_id)?.data,
        };

        Ok(Arc::new(PathNode {
            parent: None,
            record: Arc::new(record),
            scope: NodeScope::Object(SchemaScope::root(schema)),
            value,
            segment: None,
            consumed: base,
            segments: segments.into(),
            position: 0,
        }))
    }

    /// Record this node is positioned in
    pub fn record(&self) -> &RecordRef {
        &self.record
    }

    /// Schema in scope, unless the node is a leaf
    pub fn schema(&self) -> Option<&Arc<SchemaDoc>> {
        match &self.scope {
            NodeScope::Object(scope) => Some(scope.doc()),
            NodeScope::Leaf(_) => None,
        }
    }

    /// Scope of this node
    pub fn scope(&self) -> &NodeScope {
        &self.scope
    }

    /// Value in scope
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Segment consumed to reach this node (`None` for the starting node)
    pub fn segment(&self) -> Option<&Segment> {
        self.segment.as_ref()
    }

    /// Path consumed so far, starting with `{type}/{id}`
    pub fn consumed(&self) -> &str {
        &self.consumed
    }

    /// Segments still to consume
    pub fn remaining(&self) -> &[Segment] {
        &self.segments[self.position..]
    }

    /// Next segment to consume
    pub fn next_segment(&self) -> Option<&Segment> {
        self.segments.get(self.position)
    }

    /// Check if the whole path has been consumed
    pub fn is_done(&self) -> bool {
        self.position >= self.segments.len()
    }

    /// Previous node in the chain
    pub fn parent(&self) -> Option<&Arc<PathNode>> {
        self.parent.as_ref()
    }

    /// All nodes from the starting node up to this one
    pub fn chain(&self) -> Vec<&PathNode> {
        let mut nodes = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            nodes.push(parent);
            current = parent;
        }
        nodes.reverse();
        nodes
    }

    /// Number of cross-record jumps taken to reach this node
    pub fn hops(&self) -> usize {
        self.chain()
            .windows(2)
            .filter(|pair| pair[0].record != pair[1].record)
            .count()
    }

    /// Check if the chain up to this node already visited `record`
    pub fn visits(&self, record: &RecordRef) -> bool {
        self.chain().iter().any(|node| *node.record == *record)
    }

    /// Consume the next segment
    ///
    /// Returns the node itself when nothing is left to consume.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] describing the failing segment, or whatever
    /// `conn` returns while following a cross-type reference.
    pub fn consume<C: Connection + ?Sized>(self: Arc<Self>, conn: &C) -> Result<Arc<PathNode>> {
        let segment = match self.next_segment() {
            Some(segment) => segment.clone(),
            None => return Ok(self),
        };
        trace!(
            target: "schemapath::query",
            record = %self.record,
            segment = %segment,
            "consuming segment"
        );

        let consumed = join_path(&self.consumed, &segment.to_string());
        let has_more = self.position + 1 < self.segments.len();

        let (record, scope, value) = match self.step(&segment, has_more)? {
            Step::Descend(scope, value) => (
                Arc::clone(&self.record),
                NodeScope::Object(scope),
                value.clone(),
            ),
            Step::Leaf(kind, value) => (Arc::clone(&self.record), NodeScope::Leaf(kind), value.clone()),
            Step::Jump(target) => {
                if self.visits(&target) {
                    return Err(self.fail(
                        &segment,
                        PathErrorReason::CyclicReference {
                            data_type: target.data_type,
                            id: target.id,
                        },
                    ));
                }
                debug!(
                    target: "schemapath::query",
                    from = %self.record,
                    to = %target,
                    at = %consumed,
                    "following cross-type reference"
                );
                let schema = conn.get_schema(&target.data_type)?;
                let record = conn.get_record(&target.data_type, &target.id)?;
                (
                    Arc::new(target),
                    NodeScope::Object(SchemaScope::root(schema)),
                    record.data,
                )
            }
        };

        let segments = Arc::clone(&self.segments);
        let position = self.position + 1;
        Ok(Arc::new(PathNode {
            parent: Some(self),
            record,
            scope,
            value,
            segment: Some(segment),
            consumed,
            segments,
            position,
        }))
    }

    fn step<'a>(&'a self, segment: &Segment, has_more: bool) -> Result<Step<'a>> {
        let scope = match &self.scope {
            NodeScope::Object(scope) => scope,
            NodeScope::Leaf(PropertyKind::Scalar) => {
                return Err(self.fail(segment, PathErrorReason::ScalarDescent))
            }
            NodeScope::Leaf(kind) => {
                return Err(self.fail(
                    segment,
                    PathErrorReason::CollectionDescent {
                        kind: kind.as_str(),
                    },
                ))
            }
        };

        let property = scope
            .doc()
            .property(segment.name())
            .ok_or_else(|| self.fail(segment, PathErrorReason::PropertyNotFound))?;
        let object = self
            .value
            .as_object()
            .ok_or_else(|| self.mismatch(segment, "object", &self.value))?;
        let value = object
            .get(segment.name())
            .ok_or_else(|| self.fail(segment, PathErrorReason::ValueNotPresent))?;

        let (effective, value) = match segment.index() {
            None => (property, value),
            Some(index) => self.index_into(segment, property, value, index)?,
        };

        if let Some(target_type) = effective.cross_type_ref() {
            if !has_more {
                return Ok(Step::Leaf(PropertyKind::Scalar, value));
            }
            let id = value
                .as_str()
                .ok_or_else(|| self.mismatch(segment, "string", value))?;
            return Ok(Step::Jump(RecordRef::new(target_type, id)));
        }

        Ok(match effective.shape() {
            PropertyShape::Object(_) | PropertyShape::Ref(_) => {
                let nested = scope.enter(effective).ok_or_else(|| {
                    SchemaError::new(
                        scope.doc().id(),
                        SchemaErrorReason::UnresolvedRef(
                            effective.reference().unwrap_or_default().to_string(),
                        ),
                    )
                })?;
                Step::Descend(nested, value)
            }
            shape => Step::Leaf(shape.kind(), value),
        })
    }

    fn index_into<'a>(
        &self,
        segment: &Segment,
        property: &'a PropertySchema,
        value: &'a Value,
        index: &str,
    ) -> Result<(&'a PropertySchema, &'a Value)> {
        match property.shape() {
            PropertyShape::Array(items) => {
                let array = value
                    .as_array()
                    .ok_or_else(|| self.mismatch(segment, "array", value))?;
                let position = array_index(index).ok_or_else(|| {
                    self.fail(segment, PathErrorReason::InvalidIndex(index.to_string()))
                })?;
                let element = array.get(position).ok_or_else(|| {
                    self.fail(
                        segment,
                        PathErrorReason::IndexOutOfRange {
                            index: position,
                            len: array.len(),
                        },
                    )
                })?;
                Ok((items.as_ref(), element))
            }
            PropertyShape::Map(items) => {
                let map = value
                    .as_object()
                    .ok_or_else(|| self.mismatch(segment, "map", value))?;
                let element = map.get(index).ok_or_else(|| {
                    self.fail(segment, PathErrorReason::KeyNotFound(index.to_string()))
                })?;
                Ok((items.as_ref(), element))
            }
            shape => Err(self.fail(
                segment,
                PathErrorReason::NotIndexable {
                    kind: shape.kind().as_str(),
                },
            )),
        }
    }

    fn fail(&self, segment: &Segment, reason: PathErrorReason) -> Error {
        PathError::new(self.consumed.clone(), segment.to_string(), reason).into()
    }

    fn mismatch(&self, segment: &Segment, expected: &'static str, found: &Value) -> Error {
        self.fail(
            segment,
            PathErrorReason::TypeMismatch {
                expected,
                found: kind_name(found),
            },
        )
    }
}
