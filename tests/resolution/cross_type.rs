//! Jumps from one record into another through cross-type references

use crate::common::*;
use schemapath::{create_query, resolve, Error, NotFoundError, PathErrorReason, Record, RecordRef};
use serde_json::json;

#[test]
fn test_hop_continues_in_referenced_record() {
    let store = store();
    assert_eq!(
        resolve(&store, "schema1/data1/value/value2/test").unwrap(),
        json!("testStr")
    );
}

#[test]
fn test_path_ending_on_reference_returns_id() {
    let store = store();
    assert_eq!(
        resolve(&store, "schema1/data1/value/value2").unwrap(),
        json!("data02")
    );
}

#[test]
fn test_walk_records_the_hop() {
    let store = store();
    let query = create_query(&store, "schema1", "data1/value/value2/test").unwrap();
    let node = query.walk().unwrap();

    assert_eq!(node.hops(), 1);
    assert_eq!(node.record(), &RecordRef::new("schema2", "data02"));
    assert_eq!(node.consumed(), "schema1/data1/value/value2/test");

    let records: Vec<String> = node.chain().iter().map(|n| n.record().to_string()).collect();
    assert_eq!(
        records,
        vec!["schema1/data1", "schema1/data1", "schema2/data02", "schema2/data02"]
    );
}

#[test]
fn test_failure_after_hop_keeps_full_prefix() {
    let store = store();
    let err = path_error(resolve(&store, "schema1/data1/value/value2/nope").unwrap_err());
    assert_eq!(err.prefix, "schema1/data1/value/value2");
    assert_eq!(err.segment, "nope");
    assert_eq!(err.reason, PathErrorReason::PropertyNotFound);
}

#[test]
fn test_dangling_reference_is_not_found() {
    let store = store();
    store.put_record(Record::new(
        "schema1",
        "dangling",
        "0.0.1",
        json!({ "value": { "value1": "x", "value2": "ghost" } }),
    ));
    let err = resolve(&store, "schema1/dangling/value/value2/test").unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound(NotFoundError::Record { ref data_type, ref id })
            if data_type == "schema2" && id == "ghost"
    ));
}

#[test]
fn test_non_string_reference_is_type_mismatch() {
    let store = store();
    store.put_record(Record::new(
        "schema1",
        "numeric",
        "0.0.1",
        json!({ "value": { "value1": "x", "value2": 42 } }),
    ));
    let err = resolve(&store, "schema1/numeric/value/value2/test").unwrap_err();
    assert_eq!(
        path_reason(err),
        PathErrorReason::TypeMismatch {
            expected: "string",
            found: "number"
        }
    );
}
