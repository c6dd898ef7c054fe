//! Indexing and mutation protocol of the fragment tree.

use json_document::{
    Document, LoadOptions, LookupError, Map, PathComponent, Value, loads, path,
};

fn doc() -> Document {
    loads(
        r#"{"count": 3, "tags": ["a", "b", "c"], "nested": {"inner": null}}"#,
        &LoadOptions::default(),
    )
    .unwrap()
}

#[test]
fn get_returns_child_fragments() {
    let doc = doc();
    let count = doc.get("count").unwrap();
    assert_eq!(count.value().unwrap(), Value::from(3_i64));
    assert_eq!(count.key(), Some(&PathComponent::from("count")));
    assert!(!count.is_root());

    let second = doc.get("tags").unwrap().get(1).unwrap();
    assert_eq!(second.value().unwrap(), Value::from("b"));
    assert_eq!(second.path(), path!["tags", 1]);
}

#[test]
fn get_on_scalar_fails() {
    let doc = doc();
    let err = doc.get("count").unwrap().get("x").unwrap_err();
    assert_eq!(err, LookupError::NotAContainer { kind: "number" });
}

#[test]
fn get_missing_member_fails() {
    let doc = doc();
    assert!(matches!(
        doc.get("absent").unwrap_err(),
        LookupError::Missing { .. }
    ));
    assert!(matches!(
        doc.get("tags").unwrap().get(9).unwrap_err(),
        LookupError::Missing { .. }
    ));
    // Component kind must match the container.
    assert!(doc.get(0).is_err());
    assert!(doc.get("tags").unwrap().get("x").is_err());
}

#[test]
fn at_walks_deep_paths() {
    let doc = doc();
    let inner = doc.at(&path!["nested", "inner"]).unwrap();
    assert_eq!(inner.value().unwrap(), Value::Null);
    assert!(doc.at(&path!["nested", "missing"]).is_err());
}

#[test]
fn parent_links_back() {
    let doc = doc();
    let second = doc.at(&path!["tags", 1]).unwrap();
    let tags = second.parent().unwrap();
    assert_eq!(tags.path(), path!["tags"]);
    let root = tags.parent().unwrap();
    assert!(root.is_root());
    assert!(root.parent().is_none());
}

#[test]
fn set_replaces_in_place_and_appends_new_members() {
    let doc = doc();
    doc.set("count", 4).unwrap();
    doc.set("fresh", true).unwrap();
    assert_eq!(
        doc.value().as_object().unwrap().keys().collect::<Vec<_>>(),
        ["count", "tags", "nested", "fresh"]
    );
    assert_eq!(doc.get("count").unwrap().value().unwrap(), Value::from(4_i64));
}

#[test]
fn set_array_element_and_append() {
    let doc = doc();
    let tags = doc.get("tags").unwrap();
    tags.set(0, "z").unwrap();
    tags.set(3, "d").unwrap(); // index == len appends
    assert_eq!(
        tags.value().unwrap(),
        Value::Array(vec![
            Value::from("z"),
            Value::from("b"),
            Value::from("c"),
            Value::from("d"),
        ])
    );
    assert!(tags.set(9, "x").is_err());
}

#[test]
fn set_through_scalar_fails() {
    let doc = doc();
    assert!(doc.get("count").unwrap().set("x", 1).is_err());
}

#[test]
fn delete_object_member() {
    let doc = doc();
    doc.delete("count").unwrap();
    assert!(doc.get("count").is_err());
    assert!(matches!(
        doc.delete("count").unwrap_err(),
        LookupError::Missing { .. }
    ));
    assert_eq!(
        doc.value().as_object().unwrap().keys().collect::<Vec<_>>(),
        ["tags", "nested"]
    );
}

#[test]
fn deleting_an_array_element_shifts_later_siblings() {
    let doc = doc();
    let tags = doc.get("tags").unwrap();
    let second = tags.get(1).unwrap(); // "b"
    let third = tags.get(2).unwrap(); // "c"

    tags.delete(1).unwrap();
    assert_eq!(
        tags.value().unwrap(),
        Value::Array(vec![Value::from("a"), Value::from("c")])
    );
    // Positional identity is not stable across deletion: the fragment that
    // pointed at index 1 now observes the shifted content, the one at
    // index 2 dangles, and a re-fetch finds "c" at its new index.
    assert_eq!(second.value().unwrap(), Value::from("c"));
    assert!(third.value().is_err());
    assert_eq!(tags.get(1).unwrap().value().unwrap(), Value::from("c"));
}

#[test]
fn set_value_replaces_own_position_via_parent() {
    let doc = doc();
    let inner = doc.at(&path!["nested", "inner"]).unwrap();
    inner.set_value(42).unwrap();
    assert_eq!(
        doc.at(&path!["nested", "inner"]).unwrap().value().unwrap(),
        Value::from(42_i64)
    );
}

#[test]
fn set_value_on_root_fails() {
    let doc = doc();
    let err = doc.root().set_value(Map::new()).unwrap_err();
    assert!(matches!(
        err,
        json_document::DocumentError::Lookup(LookupError::RootHasNoParent)
    ));
}

#[test]
fn set_root_replaces_the_whole_tree() {
    let doc = doc();
    doc.set_root(Value::Array(vec![Value::Null])).unwrap();
    assert_eq!(doc.value(), Value::Array(vec![Value::Null]));
}

#[test]
fn fragments_share_the_underlying_tree() {
    let doc = doc();
    let one = doc.get("nested").unwrap();
    let two = doc.get("nested").unwrap();
    one.set("inner", "changed").unwrap();
    assert_eq!(
        two.get("inner").unwrap().value().unwrap(),
        Value::from("changed")
    );
}

#[test]
fn value_copies_are_detached() {
    let doc = doc();
    let mut copy = doc.value();
    if let Value::Object(map) = &mut copy {
        map.insert("count", Value::from(99_i64));
    }
    // The document did not change.
    assert_eq!(
        doc.get("count").unwrap().value().unwrap(),
        Value::from(3_i64)
    );
}

#[test]
fn documents_built_in_memory_need_no_io() {
    let mut map = Map::new();
    map.insert("enabled", Value::Boolean(true));
    let doc = Document::new(map, None);
    assert_eq!(
        doc.get("enabled").unwrap().value().unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(doc.to_string(), r#"{"enabled":true}"#);
}
