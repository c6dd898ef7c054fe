//! Bridge accessors: hyphenated keys bound to plain method names.

use json_document::{
    AsDocument, Document, DocumentError, LoadOptions, Map, Schema, Value, bridge, loads,
};
use serde_json::json;

struct TestDocument {
    doc: Document,
}

impl AsDocument for TestDocument {
    fn document(&self) -> &Document {
        &self.doc
    }
}

bridge! {
    impl TestDocument {
        fragment foo_bar_fragment => "foo-bar-fragment";
        readonly foo_bar_readonly => "foo-bar-readonly";
        readwrite foo_bar_readwrite (set_foo_bar_readwrite, delete_foo_bar_readwrite)
            => "foo-bar-readwrite";
    }
}

fn empty() -> TestDocument {
    TestDocument {
        doc: Document::new(Map::new(), None),
    }
}

#[test]
fn fragment_accessor_returns_the_fragment() {
    let doc = empty();
    doc.doc.set("foo-bar-fragment", "marker").unwrap();
    let fragment = doc.foo_bar_fragment().unwrap();
    assert_eq!(fragment.key().unwrap().as_key().as_deref(), Some("foo-bar-fragment"));
    assert_eq!(fragment.value().unwrap(), Value::from("marker"));
}

#[test]
fn readonly_accessor_returns_the_value() {
    let doc = empty();
    doc.doc.set("foo-bar-readonly", 7).unwrap();
    assert_eq!(doc.foo_bar_readonly().unwrap(), Value::from(7_i64));
    assert!(empty().foo_bar_readonly().is_err());
}

#[test]
fn readwrite_accessor_gets_sets_and_deletes() {
    let doc = empty();
    doc.set_foo_bar_readwrite("first").unwrap();
    assert_eq!(doc.foo_bar_readwrite().unwrap(), Value::from("first"));

    doc.set_foo_bar_readwrite("second").unwrap();
    assert_eq!(doc.foo_bar_readwrite().unwrap(), Value::from("second"));

    doc.delete_foo_bar_readwrite().unwrap();
    assert!(doc.foo_bar_readwrite().is_err());
    assert!(doc.delete_foo_bar_readwrite().is_err());
}

struct Counter {
    doc: Document,
}

impl AsDocument for Counter {
    fn document(&self) -> &Document {
        &self.doc
    }
}

bridge! {
    impl Counter {
        readwrite count (set_count, delete_count) => "count";
    }
}

#[test]
fn readwrite_setter_goes_through_schema_validation() {
    let schema = Schema::new(json!({
        "type": "object",
        "properties": {"count": {"type": "integer", "minimum": 0}}
    }))
    .unwrap();
    let counter = Counter {
        doc: loads(
            r#"{"count": 0}"#,
            &LoadOptions {
                retain_order: true,
                schema: Some(schema),
            },
        )
        .unwrap(),
    };

    counter.set_count(3).unwrap();
    let err = counter.set_count(-1).unwrap_err();
    assert!(matches!(err, DocumentError::Validation(_)), "{err}");
    assert_eq!(counter.count().unwrap(), Value::from(3_i64));
}
