//! Whole-query behavior through the facade

use std::sync::Arc;
use std::thread;

use crate::common::*;
use schemapath::{create_query, resolve, Connection, ErrorKind, MemoryStore, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

const SCHEMAS: &str = r#"{"testSch01": {"name": "testSch01", "description": "Test Schema 01",
    "properties": {"testAttr01": {"type": "string"}}}}"#;

const RECORDS: &str = r#"{"testSch01": {"testId01": {"__id": "testId01", "__type": "testSch01",
    "__ver": "0.0.1", "data": {"testAttr01": "testValue01"}}}}"#;

#[test]
fn test_single_attribute_lookup() {
    let store = MemoryStore::from_json_str(SCHEMAS, RECORDS).unwrap();
    assert_eq!(
        resolve(&store, "testSch01/testId01/testAttr01").unwrap(),
        json!("testValue01")
    );

    let query = create_query(&store, "testSch01", "testId01/testAttr01").unwrap();
    assert_eq!(query.walk_value().unwrap(), json!("testValue01"));
}

#[test]
fn test_missing_type_and_record_are_not_found() {
    let store = MemoryStore::from_json_str(SCHEMAS, RECORDS).unwrap();
    let err = resolve(&store, "nope/testId01/testAttr01").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "schema [type]=[nope] does not exist");

    let err = resolve(&store, "testSch01/nope/testAttr01").unwrap_err();
    assert_eq!(err.to_string(), "record [testSch01/nope] does not exist");
}

#[test]
fn test_open_from_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("schemas.json"), SCHEMAS).unwrap();
    std::fs::write(dir.path().join("records.json"), RECORDS).unwrap();
    let config_path = dir.path().join(schemapath::CONFIG_FILE_NAME);
    StoreConfig::write_default_if_missing(&config_path).unwrap();

    let store = MemoryStore::open(&StoreConfig::from_file(&config_path).unwrap()).unwrap();
    assert_eq!(store.types(), vec!["testSch01"]);
    assert_eq!(
        resolve(&store, "testSch01/testId01/testAttr01").unwrap(),
        json!("testValue01")
    );
}

#[test]
fn test_open_missing_documents_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path().join("a.json"), dir.path().join("b.json"));
    let err = MemoryStore::open(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn test_concurrent_queries_share_one_store() {
    let conn: Arc<dyn Connection> = Arc::new(store());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let conn = Arc::clone(&conn);
            thread::spawn(move || {
                for _ in 0..50 {
                    let value = if i % 2 == 0 {
                        resolve(&conn, "schema1/data1/value/value2/test").unwrap()
                    } else {
                        resolve(&conn, "schema1/data1/peers[1]/test").unwrap()
                    };
                    let expected = if i % 2 == 0 { "testStr" } else { "third" };
                    assert_eq!(value, json!(expected));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_preloaded_start_skips_fetch() {
    let store = store();
    let schema = store.get_schema("schema2").unwrap();
    let node = schemapath::PathNode::new(
        &store,
        "schema2",
        "unsaved",
        "test",
        Some(schema),
        Some(json!({ "test": "draft" })),
    )
    .unwrap();
    let node = node.consume(&store).unwrap();
    assert!(node.is_done());
    assert_eq!(node.value(), &json!("draft"));
}
