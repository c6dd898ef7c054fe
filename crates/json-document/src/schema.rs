//! Black-box JSON Schema capability.
//!
//! Validation itself is delegated to the `jsonschema` crate. This module
//! knows two things on top of it: how to walk a schema document along a
//! fragment path to find the sub-schema governing that position, and how
//! to keep compiled validators around so repeated writes to the same
//! position compile once.

use std::{cell::RefCell, fmt, rc::Rc, sync::Arc};

use ahash::AHashMap;

use crate::{codec, error::ValidationError, path::PathComponent, value::Value};

/// A JSON Schema attached to a document at construction time.
///
/// Cloning is cheap; clones share the schema document and the validator
/// cache. Single-threaded by design, like the documents it validates.
#[derive(Clone)]
pub struct Schema {
    root: Arc<serde_json::Value>,
    validators: Rc<RefCell<AHashMap<Box<str>, Rc<jsonschema::Validator>>>>,
}

impl Schema {
    /// Wraps a schema document.
    ///
    /// The root schema is compiled eagerly so a malformed schema fails
    /// here rather than on the first write.
    pub fn new(root: serde_json::Value) -> Result<Self, ValidationError> {
        let validator = jsonschema::validator_for(&root).map_err(ValidationError::from)?;
        let mut validators = AHashMap::new();
        validators.insert(Box::from(""), Rc::new(validator));
        Ok(Self {
            root: Arc::new(root),
            validators: Rc::new(RefCell::new(validators)),
        })
    }

    /// The schema document this capability was built from.
    #[must_use]
    pub fn root(&self) -> &serde_json::Value {
        &self.root
    }

    /// Resolves the sub-schema governing `path`, if one exists.
    ///
    /// Object members resolve through `properties`, falling back to
    /// `additionalProperties`; array elements through `prefixItems` /
    /// `items` (object or tuple form), falling back to `additionalItems`.
    /// A position nothing in the schema describes is unvalidated.
    pub(crate) fn resolve(&self, path: &[PathComponent]) -> Option<&serde_json::Value> {
        let mut node: &serde_json::Value = &self.root;
        for component in path {
            node = step(node, component)?;
        }
        Some(node)
    }

    /// Validates `candidate` against the sub-schema at `path`.
    ///
    /// Positions with no resolvable sub-schema accept any value.
    pub(crate) fn check(
        &self,
        path: &[PathComponent],
        candidate: &Value,
    ) -> Result<(), ValidationError> {
        let Some(node) = self.resolve(path) else {
            return Ok(());
        };
        let validator = self.validator_at(path, node)?;
        let raw = codec::to_raw(candidate);
        validator.validate(&raw).map_err(ValidationError::from)
    }

    fn validator_at(
        &self,
        path: &[PathComponent],
        node: &serde_json::Value,
    ) -> Result<Rc<jsonschema::Validator>, ValidationError> {
        let key = pointer_for(path);
        if let Some(validator) = self.validators.borrow().get(&key) {
            return Ok(validator.clone());
        }
        let validator = Rc::new(jsonschema::validator_for(node).map_err(ValidationError::from)?);
        self.validators
            .borrow_mut()
            .insert(key, validator.clone());
        Ok(validator)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

fn step<'a>(
    node: &'a serde_json::Value,
    component: &PathComponent,
) -> Option<&'a serde_json::Value> {
    // Boolean sub-schemas have no sub-structure to descend into.
    let schema = node.as_object()?;
    match component {
        PathComponent::Key(key) => {
            if let Some(sub) = schema
                .get("properties")
                .and_then(|props| props.get(key.as_ref()))
            {
                return Some(sub);
            }
            schema.get("additionalProperties").filter(|v| is_schema(v))
        }
        PathComponent::Index(index) => {
            if let Some(prefix) = schema
                .get("prefixItems")
                .and_then(serde_json::Value::as_array)
            {
                if let Some(sub) = prefix.get(*index) {
                    return Some(sub);
                }
                return schema.get("items").filter(|v| is_schema(v));
            }
            match schema.get("items") {
                // Tuple form (pre-2020 drafts): per-index schemas, overflow
                // goes to additionalItems.
                Some(serde_json::Value::Array(tuple)) => tuple
                    .get(*index)
                    .or_else(|| schema.get("additionalItems").filter(|v| is_schema(v))),
                Some(sub) if is_schema(sub) => Some(sub),
                _ => None,
            }
        }
    }
}

fn is_schema(value: &serde_json::Value) -> bool {
    value.is_object() || value.is_boolean()
}

// Cache key: the fragment path in JSON Pointer form (RFC 6901), with `~`
// and `/` escaped so keys containing them cannot collide.
fn pointer_for(path: &[PathComponent]) -> Box<str> {
    use fmt::Write;

    let mut out = String::new();
    for component in path {
        out.push('/');
        match component {
            PathComponent::Key(key) => {
                for c in key.chars() {
                    match c {
                        '~' => out.push_str("~0"),
                        '/' => out.push_str("~1"),
                        _ => out.push(c),
                    }
                }
            }
            PathComponent::Index(index) => {
                let _ = write!(out, "{index}");
            }
        }
    }
    out.into()
}
