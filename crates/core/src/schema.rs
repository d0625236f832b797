//! Schema documents
//!
//! A [`SchemaDoc`] is the parsed definition of one record type. It maps
//! property names to [`PropertySchema`]s, each of which has one of four
//! shapes:
//!
//! | Declared `type` | Shape | Traversal |
//! |-----------------|-------|-----------|
//! | `object` | [`PropertyShape::Object`] | descend with the nested schema |
//! | `array` | [`PropertyShape::Array`] | index by position |
//! | `map` | [`PropertyShape::Map`] | index by key |
//! | anything else | [`PropertyShape::Scalar`] | leaf |
//!
//! Object properties either declare inline `properties` or point at a local
//! definition with `$ref: "#/definitions/{name}"`. Each definition is parsed
//! once. A `$ref` is checked against the visible definition names while
//! parsing but kept as a name ([`PropertyShape::Ref`]); it is looked up
//! through a [`SchemaScope`] only when a traversal enters it. Definitions may
//! therefore refer to themselves, directly or through each other.
//!
//! A scalar property whose `contentMediaType` is `inventory/{type}` holds the
//! id of a record of `{type}` (a cross-type reference).
//!
//! # Examples
//!
//! ```
//! use schemapath_core::schema::{PropertyKind, SchemaDoc, SchemaScope};
//! use std::sync::Arc;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "name": "schema1",
//!     "properties": {
//!         "value": { "type": "object", "$ref": "#/definitions/testValue" }
//!     },
//!     "definitions": {
//!         "testValue": {
//!             "properties": {
//!                 "value2": { "type": "string", "contentMediaType": "inventory/schema2" }
//!             }
//!         }
//!     }
//! });
//!
//! let doc = SchemaDoc::new(&raw, "schema1", None).unwrap();
//! let value = doc.property("value").unwrap();
//! assert_eq!(value.kind(), PropertyKind::Object);
//! assert_eq!(value.reference(), Some("testValue"));
//!
//! let root = SchemaScope::root(Arc::new(doc.clone()));
//! let nested = root.enter(value).unwrap();
//! let value2 = nested.doc().property("value2").unwrap();
//! assert_eq!(value2.cross_type_ref(), Some("schema2"));
//! ```

use crate::error::{SchemaError, SchemaErrorReason};
use crate::value::{kind_name, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Schema document field names
pub mod keys {
    /// Human readable type name
    pub const NAME: &str = "name";
    /// Free-form description
    pub const DESCRIPTION: &str = "description";
    /// Property table
    pub const PROPERTIES: &str = "properties";
    /// Local definition table
    pub const DEFINITIONS: &str = "definitions";
    /// Declared property type
    pub const TYPE: &str = "type";
    /// Element shape of arrays and maps
    pub const ITEMS: &str = "items";
    /// Internal definition pointer
    pub const REF: &str = "$ref";
    /// Media type, doubles as the cross-type reference marker
    pub const CONTENT_MEDIA_TYPE: &str = "contentMediaType";
}

/// Prefix of an internal `$ref` pointer
pub const REF_PREFIX: &str = "#/definitions/";

/// Media type prefix that marks a cross-type reference
pub const CROSS_TYPE_MEDIA_PREFIX: &str = "inventory/";

/// Parsed local definitions, keyed by definition name
pub type Definitions = BTreeMap<String, Arc<SchemaDoc>>;

/// Kind of a property, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Leaf value
    Scalar,
    /// Nested object
    Object,
    /// Sequence indexed by position
    Array,
    /// Mapping indexed by key
    Map,
}

impl PropertyKind {
    /// Classify a declared `type`
    ///
    /// Anything other than `object`, `array` or `map` is a scalar.
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "object" => PropertyKind::Object,
            "array" => PropertyKind::Array,
            "map" => PropertyKind::Map,
            _ => PropertyKind::Scalar,
        }
    }

    /// Lowercase kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Scalar => "scalar",
            PropertyKind::Object => "object",
            PropertyKind::Array => "array",
            PropertyKind::Map => "map",
        }
    }

    /// Check if this kind is an array or a map
    pub fn is_collection(&self) -> bool {
        matches!(self, PropertyKind::Array | PropertyKind::Map)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a property, with the payload each kind needs
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyShape {
    /// Leaf value
    Scalar,
    /// Nested object described inline
    Object(Arc<SchemaDoc>),
    /// Nested object described by the named definition
    Ref(String),
    /// Array of `items`
    Array(Box<PropertySchema>),
    /// Map from string keys to `items`
    Map(Box<PropertySchema>),
}

impl PropertyShape {
    /// Kind of this shape
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyShape::Scalar => PropertyKind::Scalar,
            PropertyShape::Object(_) | PropertyShape::Ref(_) => PropertyKind::Object,
            PropertyShape::Array(_) => PropertyKind::Array,
            PropertyShape::Map(_) => PropertyKind::Map,
        }
    }
}

/// One declared property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    name: String,
    declared_type: String,
    shape: PropertyShape,
    cross_type_ref: Option<String>,
}

impl PropertySchema {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `type` as written in the schema (`string`, `integer`, `object`, ...)
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Shape of the property
    pub fn shape(&self) -> &PropertyShape {
        &self.shape
    }

    /// Kind of the property
    pub fn kind(&self) -> PropertyKind {
        self.shape.kind()
    }

    /// Definition name this property's object shape refers to, if any
    pub fn reference(&self) -> Option<&str> {
        match &self.shape {
            PropertyShape::Ref(name) => Some(name),
            _ => None,
        }
    }

    /// Type whose record ids this property holds, if any
    pub fn cross_type_ref(&self) -> Option<&str> {
        self.cross_type_ref.as_deref()
    }

    /// Nested schema of an inline object property
    ///
    /// Properties that use `$ref` are entered through a [`SchemaScope`].
    pub fn object_schema(&self) -> Option<&Arc<SchemaDoc>> {
        match &self.shape {
            PropertyShape::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Element shape of an array or map property
    pub fn items(&self) -> Option<&PropertySchema> {
        match &self.shape {
            PropertyShape::Array(items) | PropertyShape::Map(items) => Some(items),
            _ => None,
        }
    }

    fn parse(name: &str, raw: &Value, path: &str, scope: &Scope<'_>) -> Result<Self, SchemaError> {
        let fail = |reason| SchemaError::new(path, reason);
        let obj = raw.as_object().ok_or_else(|| {
            fail(SchemaErrorReason::NotAnObject {
                found: kind_name(raw),
            })
        })?;

        let declared_type = match obj.get(keys::TYPE) {
            None => return Err(fail(SchemaErrorReason::MissingType)),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(fail(SchemaErrorReason::InvalidField {
                    field: keys::TYPE,
                    expected: "a string",
                    found: kind_name(other),
                }))
            }
        };
        let kind = PropertyKind::from_declared(&declared_type);

        let reference = match optional_str(obj, keys::REF, path)? {
            None => None,
            Some(pointer) => Some(parse_ref(pointer).ok_or_else(|| {
                fail(SchemaErrorReason::InvalidRef(pointer.to_string()))
            })?),
        };
        if reference.is_some() && kind != PropertyKind::Object {
            return Err(fail(SchemaErrorReason::RefOnNonObject {
                kind: kind.as_str(),
            }));
        }

        let cross_type_ref = match optional_str(obj, keys::CONTENT_MEDIA_TYPE, path)? {
            None => None,
            Some(media) => parse_cross_type(media).map_err(fail)?,
        };
        if cross_type_ref.is_some() && kind != PropertyKind::Scalar {
            return Err(fail(SchemaErrorReason::CrossRefOnNonScalar {
                kind: kind.as_str(),
            }));
        }

        let shape = match kind {
            PropertyKind::Scalar => PropertyShape::Scalar,
            PropertyKind::Object => match reference {
                Some(def) if scope.contains(&def) => PropertyShape::Ref(def),
                Some(def) => return Err(fail(SchemaErrorReason::UnresolvedRef(def))),
                None => PropertyShape::Object(Arc::new(SchemaDoc::parse(
                    raw,
                    path,
                    path,
                    Parent::Scope(scope),
                )?)),
            },
            PropertyKind::Array | PropertyKind::Map => {
                let items_raw = obj.get(keys::ITEMS).ok_or_else(|| {
                    fail(SchemaErrorReason::MissingItems {
                        kind: kind.as_str(),
                    })
                })?;
                let items_path = format!("{}.{}", path, keys::ITEMS);
                let items = Box::new(PropertySchema::parse(name, items_raw, &items_path, scope)?);
                if kind == PropertyKind::Array {
                    PropertyShape::Array(items)
                } else {
                    PropertyShape::Map(items)
                }
            }
        };

        Ok(PropertySchema {
            name: name.to_string(),
            declared_type,
            shape,
            cross_type_ref,
        })
    }
}

/// Parsed schema of one record type (or of a nested object)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDoc {
    id: String,
    name: Option<String>,
    description: Option<String>,
    properties: BTreeMap<String, PropertySchema>,
    definitions: Definitions,
    inherited: Definitions,
}

impl SchemaDoc {
    /// Parse a raw schema definition
    ///
    /// `id` is the type name the definition belongs to. `parent_definitions`
    /// supplies definitions inherited from an enclosing schema; the
    /// document's own `definitions` shadow inherited ones with the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] locating the first offending property or
    /// definition.
    pub fn new(
        raw: &Value,
        id: &str,
        parent_definitions: Option<&Definitions>,
    ) -> Result<Self, SchemaError> {
        let parent = match parent_definitions {
            Some(defs) => Parent::Inherited(defs),
            None => Parent::Root,
        };
        let mut doc = SchemaDoc::parse(raw, id, id, parent)?;
        if let Some(defs) = parent_definitions {
            doc.inherited = defs.clone();
        }
        Ok(doc)
    }

    /// Type name (or location, for nested objects)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared `name`, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared `description`, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All properties, ordered by name
    pub fn properties(&self) -> &BTreeMap<String, PropertySchema> {
        &self.properties
    }

    /// Look up a property
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    /// Own local definitions
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Look up an own local definition
    pub fn definition(&self, name: &str) -> Option<&Arc<SchemaDoc>> {
        self.definitions.get(name)
    }

    /// Definitions inherited from an enclosing schema
    pub fn inherited(&self) -> &Definitions {
        &self.inherited
    }

    fn parse(raw: &Value, id: &str, path: &str, parent: Parent<'_>) -> Result<Self, SchemaError> {
        let obj = raw.as_object().ok_or_else(|| {
            SchemaError::new(
                path,
                SchemaErrorReason::NotAnObject {
                    found: kind_name(raw),
                },
            )
        })?;

        let name = optional_str(obj, keys::NAME, path)?.map(str::to_string);
        let description = optional_str(obj, keys::DESCRIPTION, path)?.map(str::to_string);
        let raw_definitions = optional_object(obj, keys::DEFINITIONS, path)?;

        let scope = Scope {
            raw: raw_definitions,
            parent,
        };

        let mut properties = BTreeMap::new();
        if let Some(raw_properties) = optional_object(obj, keys::PROPERTIES, path)? {
            for (prop_name, prop_raw) in raw_properties {
                let prop_path = format!("{}.{}", path, prop_name);
                let prop = PropertySchema::parse(prop_name, prop_raw, &prop_path, &scope)?;
                properties.insert(prop_name.clone(), prop);
            }
        }

        let mut definitions = Definitions::new();
        if let Some(raw_definitions) = raw_definitions {
            for (def_name, def_raw) in raw_definitions {
                let def_path = format!("{}.{}.{}", path, keys::DEFINITIONS, def_name);
                let def = SchemaDoc::parse(def_raw, def_name, &def_path, Parent::Scope(&scope))?;
                definitions.insert(def_name.clone(), Arc::new(def));
            }
        }

        Ok(SchemaDoc {
            id: id.to_string(),
            name,
            description,
            properties,
            definitions,
            inherited: Definitions::new(),
        })
    }
}

// =============================================================================
// Definition resolution
// =============================================================================

/// Lexical chain of schemas a traversal has entered
///
/// The root link is a record type's schema. Entering an inline object or a
/// `$ref` pushes a new link, so a definition sees its own nested definitions
/// first, then those of every enclosing level. Links are created on demand,
/// which keeps recursive definitions finite.
#[derive(Debug)]
pub struct SchemaScope {
    doc: Arc<SchemaDoc>,
    parent: Option<Arc<SchemaScope>>,
}

impl SchemaScope {
    /// Start a chain at a record type's schema
    pub fn root(doc: Arc<SchemaDoc>) -> Arc<Self> {
        Arc::new(SchemaScope { doc, parent: None })
    }

    /// Schema of this link
    pub fn doc(&self) -> &Arc<SchemaDoc> {
        &self.doc
    }

    /// Enclosing link
    pub fn parent(&self) -> Option<&Arc<SchemaScope>> {
        self.parent.as_ref()
    }

    /// Look a definition up, innermost level first
    pub fn resolve(self: &Arc<Self>, name: &str) -> Option<Arc<SchemaScope>> {
        let mut link = self;
        loop {
            let found = link
                .doc
                .definitions
                .get(name)
                .or_else(|| link.doc.inherited.get(name));
            if let Some(def) = found {
                return Some(Arc::new(SchemaScope {
                    doc: Arc::clone(def),
                    parent: Some(Arc::clone(link)),
                }));
            }
            link = link.parent.as_ref()?;
        }
    }

    /// Enter an object property
    ///
    /// Returns `None` for scalars and collections, and for a `$ref` whose
    /// definition is not visible from this link.
    pub fn enter(self: &Arc<Self>, property: &PropertySchema) -> Option<Arc<SchemaScope>> {
        match property.shape() {
            PropertyShape::Object(doc) => Some(Arc::new(SchemaScope {
                doc: Arc::clone(doc),
                parent: Some(Arc::clone(self)),
            })),
            PropertyShape::Ref(name) => self.resolve(name),
            _ => None,
        }
    }
}

enum Parent<'a> {
    Root,
    Inherited(&'a Definitions),
    Scope(&'a Scope<'a>),
}

/// Definition names visible while parsing one document level
struct Scope<'a> {
    raw: Option<&'a Map<String, Value>>,
    parent: Parent<'a>,
}

impl Scope<'_> {
    fn contains(&self, name: &str) -> bool {
        if self.raw.is_some_and(|defs| defs.contains_key(name)) {
            return true;
        }
        match &self.parent {
            Parent::Scope(parent) => parent.contains(name),
            Parent::Inherited(defs) => defs.contains_key(name),
            Parent::Root => false,
        }
    }
}

/// Extract the definition name from `#/definitions/{name}`
fn parse_ref(pointer: &str) -> Option<String> {
    let name = pointer.strip_prefix(REF_PREFIX)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name.to_string())
}

/// Extract the referenced type from `inventory/{type}`
///
/// Other media types are ordinary content annotations.
fn parse_cross_type(media: &str) -> Result<Option<String>, SchemaErrorReason> {
    match media.strip_prefix(CROSS_TYPE_MEDIA_PREFIX) {
        None => Ok(None),
        Some("") => Err(SchemaErrorReason::EmptyCrossRef(media.to_string())),
        Some(data_type) => Ok(Some(data_type.to_string())),
    }
}

fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<&'a str>, SchemaError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(SchemaError::new(
            path,
            SchemaErrorReason::InvalidField {
                field,
                expected: "a string",
                found: kind_name(other),
            },
        )),
    }
}

fn optional_object<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<&'a Map<String, Value>>, SchemaError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Object(m)) => Ok(Some(m)),
        Some(other) => Err(SchemaError::new(
            path,
            SchemaErrorReason::InvalidField {
                field,
                expected: "an object",
                found: kind_name(other),
            },
        )),
    }
}
