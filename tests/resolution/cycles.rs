//! Cyclic cross-type references

use crate::common::*;
use schemapath::{resolve, PathErrorReason};
use serde_json::json;

fn cycle(data_type: &str, id: &str) -> PathErrorReason {
    PathErrorReason::CyclicReference {
        data_type: data_type.to_string(),
        id: id.to_string(),
    }
}

#[test]
fn test_self_reference_rejected() {
    let store = store();
    let err = path_error(resolve(&store, "node/self/next/label").unwrap_err());
    assert_eq!(err.prefix, "node/self");
    assert_eq!(err.segment, "next");
    assert_eq!(err.reason, cycle("node", "self"));
}

#[test]
fn test_two_record_cycle_rejected() {
    let store = store();
    assert_eq!(resolve(&store, "node/a/next/label").unwrap(), json!("B"));

    let err = path_error(resolve(&store, "node/a/next/next/label").unwrap_err());
    assert_eq!(err.prefix, "node/a/next");
    assert_eq!(err.reason, cycle("node", "a"));
}

#[test]
fn test_cycle_across_types_rejected() {
    let store = store();
    let err = resolve(&store, "schema1/data1/value/value2/owner/name").unwrap_err();
    assert_eq!(path_reason(err), cycle("schema1", "data1"));
}

#[test]
fn test_ending_on_back_reference_is_not_a_cycle() {
    let store = store();
    assert_eq!(resolve(&store, "node/self/next").unwrap(), json!("self"));
    assert_eq!(
        resolve(&store, "schema1/data1/value/value2/owner").unwrap(),
        json!("data1")
    );
}
