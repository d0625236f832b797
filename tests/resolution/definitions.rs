//! `$ref` definitions as seen through resolution

use std::sync::Arc;

use crate::common::*;
use schemapath::{
    resolve, Connection, ErrorKind, MemoryStore, PropertyKind, Record, SchemaDoc,
    SchemaErrorReason, SchemaScope,
};
use serde_json::{json, Value};

fn schema_with_definition(definition: Value) -> Value {
    json!({
        "properties": {
            "value": { "type": "object", "$ref": "#/definitions/testValue" }
        },
        "definitions": { "testValue": definition }
    })
}

#[test]
fn test_ref_resolves_to_the_definition() {
    let store = store();
    let schema = store.get_schema("schema1").unwrap();
    let value = schema.property("value").unwrap();
    let definition = schema.definition("testValue").unwrap();

    assert_eq!(value.reference(), Some("testValue"));
    let scope = SchemaScope::root(Arc::clone(&schema)).enter(value).unwrap();
    assert!(Arc::ptr_eq(scope.doc(), definition));
    assert_eq!(resolve(&store, "schema1/data1/value/value1").unwrap(), json!("01"));
}

#[test]
fn test_reparsed_definition_changes_resolved_shape() {
    let first = SchemaDoc::new(
        &schema_with_definition(json!({ "properties": { "a": { "type": "string" } } })),
        "t",
        None,
    )
    .unwrap();
    let second = SchemaDoc::new(
        &schema_with_definition(json!({
            "properties": { "b": { "type": "array", "items": { "type": "string" } } }
        })),
        "t",
        None,
    )
    .unwrap();

    let shape = |doc: &SchemaDoc| {
        let root = SchemaScope::root(Arc::new(doc.clone()));
        let nested = root.enter(doc.property("value").unwrap()).unwrap();
        nested
            .doc()
            .properties()
            .iter()
            .map(|(name, p)| (name.clone(), p.kind()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), vec![("a".to_string(), PropertyKind::Scalar)]);
    assert_eq!(shape(&second), vec![("b".to_string(), PropertyKind::Array)]);
}

#[test]
fn test_replaced_schema_is_used_by_later_queries() {
    let store = MemoryStore::new();
    store.put_record(Record::new("t", "r", "1", json!({ "value": { "a": "A", "b": "B" } })));

    store
        .put_schema(
            "t",
            &schema_with_definition(json!({ "properties": { "a": { "type": "string" } } })),
        )
        .unwrap();
    assert_eq!(resolve(&store, "t/r/value/a").unwrap(), json!("A"));
    assert!(resolve(&store, "t/r/value/b").is_err());

    store
        .put_schema(
            "t",
            &schema_with_definition(json!({ "properties": { "b": { "type": "string" } } })),
        )
        .unwrap();
    assert_eq!(resolve(&store, "t/r/value/b").unwrap(), json!("B"));
    assert!(resolve(&store, "t/r/value/a").is_err());
}

#[test]
fn test_unresolved_ref_fails_at_load() {
    let err = MemoryStore::from_documents(
        &json!({ "t": { "properties": {
            "value": { "type": "object", "$ref": "#/definitions/missing" }
        } } }),
        &json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    match err {
        schemapath::Error::Schema(e) => {
            assert_eq!(e.path, "t.value");
            assert_eq!(e.reason, SchemaErrorReason::UnresolvedRef("missing".to_string()));
        }
        other => panic!("expected schema error, got: {}", other),
    }
}

#[test]
fn test_cross_type_marker_on_object_fails_at_load() {
    let err = MemoryStore::from_documents(
        &json!({ "t": { "properties": {
            "value": { "type": "object", "contentMediaType": "inventory/other", "properties": {} }
        } } }),
        &json!({}),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

fn tree_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .put_schema(
            "tree",
            &json!({
                "properties": {
                    "root": { "type": "object", "$ref": "#/definitions/node" }
                },
                "definitions": {
                    "node": {
                        "properties": {
                            "label": { "type": "string" },
                            "child": { "type": "object", "$ref": "#/definitions/node" },
                            "children": {
                                "type": "array",
                                "items": { "type": "object", "$ref": "#/definitions/node" }
                            }
                        }
                    }
                }
            }),
        )
        .unwrap();
    store.put_record(Record::new(
        "tree",
        "r",
        "1",
        json!({ "root": {
            "label": "top",
            "child": { "label": "mid", "child": { "label": "leaf" } },
            "children": [{ "label": "first" }, { "label": "second", "child": { "label": "deep" } }]
        } }),
    ));
    store
}

#[test]
fn test_self_referencing_definition_loads_and_resolves() {
    let store = tree_store();
    assert_eq!(resolve(&store, "tree/r/root/label").unwrap(), json!("top"));
    assert_eq!(resolve(&store, "tree/r/root/child/child/label").unwrap(), json!("leaf"));
    assert_eq!(
        resolve(&store, "tree/r/root/children[1]/child/label").unwrap(),
        json!("deep")
    );
}

#[test]
fn test_self_referencing_definition_stops_at_data() {
    let store = tree_store();
    let err = resolve(&store, "tree/r/root/child/child/child/label").unwrap_err();
    assert_eq!(path_reason(err), schemapath::PathErrorReason::ValueNotPresent);
}

#[test]
fn test_mutually_referencing_definitions_load() {
    let store = MemoryStore::from_documents(
        &json!({ "t": {
            "properties": { "a": { "type": "object", "$ref": "#/definitions/a" } },
            "definitions": {
                "a": { "properties": {
                    "name": { "type": "string" },
                    "b": { "type": "object", "$ref": "#/definitions/b" }
                } },
                "b": { "properties": { "a": { "type": "object", "$ref": "#/definitions/a" } } }
            }
        } }),
        &json!({ "t": { "r": envelope("t", "r", json!({
            "a": { "b": { "a": { "name": "again" } } }
        })) } }),
    )
    .unwrap();
    assert_eq!(resolve(&store, "t/r/a/b/a/name").unwrap(), json!("again"));
}
