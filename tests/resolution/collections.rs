//! Array and map addressing

use crate::common::*;
use proptest::prelude::*;
use schemapath::{resolve, MemoryStore, PathErrorReason, PathParseError, Record};
use serde_json::{json, Map, Value};

#[test]
fn test_array_index_in_bounds() {
    let store = store();
    assert_eq!(resolve(&store, "schema1/data1/list[0]").unwrap(), json!(10));
    assert_eq!(resolve(&store, "schema1/data1/list[2]").unwrap(), json!(30));
}

#[test]
fn test_array_index_out_of_range() {
    let store = store();
    let err = path_error(resolve(&store, "schema1/data1/list[3]").unwrap_err());
    assert_eq!(err.prefix, "schema1/data1");
    assert_eq!(err.segment, "list[3]");
    assert_eq!(err.reason, PathErrorReason::IndexOutOfRange { index: 3, len: 3 });
}

#[test]
fn test_array_index_must_be_integer() {
    let store = store();
    for index in ["abc", "-1", "+1", "1.0", " 1"] {
        let err = resolve(&store, &format!("schema1/data1/list[{}]", index)).unwrap_err();
        assert_eq!(
            path_reason(err),
            PathErrorReason::InvalidIndex(index.to_string()),
            "index {:?}",
            index
        );
    }
}

#[test]
fn test_map_key_lookup() {
    let store = store();
    assert_eq!(
        resolve(&store, "schema1/data1/mapStr[keyExists]").unwrap(),
        json!("exists")
    );
    let err = resolve(&store, "schema1/data1/mapStr[keyMissing]").unwrap_err();
    assert_eq!(
        path_reason(err),
        PathErrorReason::KeyNotFound("keyMissing".to_string())
    );
}

#[test]
fn test_map_key_may_look_numeric() {
    let store = MemoryStore::new();
    store
        .put_schema(
            "t",
            &json!({ "properties": { "m": { "type": "map", "items": { "type": "string" } } } }),
        )
        .unwrap();
    store.put_record(Record::new("t", "r", "1", json!({ "m": { "0": "zero" } })));
    assert_eq!(resolve(&store, "t/r/m[0]").unwrap(), json!("zero"));
}

#[test]
fn test_empty_index_is_syntax_error() {
    let store = store();
    let err = path_error(resolve(&store, "schema1/data1/mapStr[]").unwrap_err());
    assert_eq!(err.prefix, "schema1/data1");
    assert_eq!(err.reason, PathErrorReason::Syntax(PathParseError::EmptyIndex));
}

#[test]
fn test_whole_collection_is_terminal() {
    let store = store();
    assert_eq!(
        resolve(&store, "schema1/data1/list").unwrap(),
        json!([10, 20, 30])
    );
    assert_eq!(
        resolve(&store, "schema1/data1/mapStr").unwrap(),
        json!({ "keyExists": "exists", "other": "value" })
    );

    let err = resolve(&store, "schema1/data1/list/0").unwrap_err();
    assert_eq!(
        path_reason(err),
        PathErrorReason::CollectionDescent { kind: "array" }
    );
}

#[test]
fn test_index_on_scalar_rejected() {
    let store = store();
    let err = resolve(&store, "schema1/data1/name[0]").unwrap_err();
    assert_eq!(path_reason(err), PathErrorReason::NotIndexable { kind: "scalar" });
}

#[test]
fn test_array_items_follow_cross_type_refs() {
    let store = store();
    assert_eq!(
        resolve(&store, "schema1/data1/peers[1]/test").unwrap(),
        json!("third")
    );
    // Ending on the element returns the stored id.
    assert_eq!(resolve(&store, "schema1/data1/peers[0]").unwrap(), json!("data02"));
}

fn array_store(len: usize) -> MemoryStore {
    let store = MemoryStore::new();
    store
        .put_schema(
            "t",
            &json!({ "properties": { "xs": { "type": "array", "items": { "type": "integer" } } } }),
        )
        .unwrap();
    let xs: Vec<Value> = (0..len).map(|i| json!(i * 7)).collect();
    store.put_record(Record::new("t", "r", "1", json!({ "xs": xs })));
    store
}

fn map_store(keys: &[String]) -> MemoryStore {
    let store = MemoryStore::new();
    store
        .put_schema(
            "t",
            &json!({ "properties": { "m": { "type": "map", "items": { "type": "string" } } } }),
        )
        .unwrap();
    let mut map = Map::new();
    for key in keys {
        map.insert(key.clone(), json!(format!("v-{}", key)));
    }
    store.put_record(Record::new("t", "r", "1", json!({ "m": map })));
    store
}

proptest! {
    #[test]
    fn prop_array_index_succeeds_iff_in_bounds(len in 0usize..16, k in 0usize..24) {
        let store = array_store(len);
        let result = resolve(&store, &format!("t/r/xs[{}]", k));
        if k < len {
            prop_assert_eq!(result.unwrap(), json!(k * 7));
        } else {
            prop_assert_eq!(
                path_reason(result.unwrap_err()),
                PathErrorReason::IndexOutOfRange { index: k, len }
            );
        }
    }

    #[test]
    fn prop_map_key_succeeds_iff_present(
        keys in prop::collection::vec("[a-z]{1,4}", 0..8),
        probe in "[a-z]{1,4}",
        reverse in any::<bool>(),
    ) {
        let mut ordered = keys.clone();
        if reverse {
            ordered.reverse();
        }
        let store = map_store(&ordered);
        let result = resolve(&store, &format!("t/r/m[{}]", probe));
        if keys.contains(&probe) {
            prop_assert_eq!(result.unwrap(), json!(format!("v-{}", probe)));
        } else {
            prop_assert_eq!(
                path_reason(result.unwrap_err()),
                PathErrorReason::KeyNotFound(probe.clone())
            );
        }
    }
}
