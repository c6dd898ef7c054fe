//! The fragment tree: positional, schema-aware views over one value tree.
//!
//! A [`Document`] exclusively owns the root [`Value`]. A [`Fragment`] is a
//! transient handle on one node: it stores the path from the root, not a
//! pointer into the tree, and re-resolves that path on every access. Two
//! lookups of the same position yield independent fragments observing the
//! same underlying data, and a fragment never serves a stale value after
//! the tree changed underneath it. The flip side is that a fragment held
//! across a structural mutation of an ancestor (say, an array deletion
//! shifting later siblings) resolves to whatever now lives at its path;
//! re-fetch after such mutations, as positional identity is not stable.
//!
//! All mutation funnels through [`Fragment::set`] and
//! [`Fragment::delete`]. `set` validates the candidate against the schema
//! resolved for the target position *before* touching the tree, so a
//! rejected write is never observable, not even transiently. There is
//! deliberately no way to assign through an unwrapped value:
//! [`Fragment::value`] returns a detached copy, and replacing a
//! fragment's own value ([`Fragment::set_value`]) delegates to the
//! parent's `set` so validation and linkage stay intact.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    error::{DocumentError, LookupError},
    path::PathComponent,
    schema::Schema,
    value::Value,
};

#[derive(Debug)]
struct Shared {
    root: RefCell<Value>,
    schema: Option<Schema>,
}

/// A JSON document: one owned [`Value`] tree plus the schema it is
/// validated against, if any.
///
/// Cloning a `Document` yields another handle on the same tree, not a
/// copy. Documents are single-threaded; a host that shares one across
/// threads must wrap it in its own mutual-exclusion boundary.
#[derive(Debug, Clone)]
pub struct Document {
    shared: Rc<Shared>,
}

impl Document {
    /// Creates a document over a freshly built or freshly parsed value.
    ///
    /// The schema, when given, validates every subsequent write; the
    /// initial value is accepted as-is (load-time validation is the
    /// caller's call, via [`Document::set_root`] if wanted).
    #[must_use]
    pub fn new(value: impl Into<Value>, schema: Option<Schema>) -> Self {
        Self {
            shared: Rc::new(Shared {
                root: RefCell::new(value.into()),
                schema,
            }),
        }
    }

    /// The root fragment.
    #[must_use]
    pub fn root(&self) -> Fragment {
        Fragment {
            shared: self.shared.clone(),
            path: Vec::new(),
        }
    }

    /// The schema attached at construction, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.shared.schema.as_ref()
    }

    /// A detached copy of the whole value tree.
    #[must_use]
    pub fn value(&self) -> Value {
        self.shared.root.borrow().clone()
    }

    /// Replaces the entire root value, validated against the root schema.
    pub fn set_root(&self, value: impl Into<Value>) -> Result<(), DocumentError> {
        let value = value.into();
        if let Some(schema) = &self.shared.schema {
            schema.check(&[], &value)?;
        }
        *self.shared.root.borrow_mut() = value;
        Ok(())
    }

    /// Child fragment of the root. See [`Fragment::get`].
    pub fn get(&self, key: impl Into<PathComponent>) -> Result<Fragment, LookupError> {
        self.root().get(key)
    }

    /// Deep lookup from the root. See [`Fragment::at`].
    pub fn at(&self, path: &[PathComponent]) -> Result<Fragment, LookupError> {
        self.root().at(path)
    }

    /// Validated write into the root container. See [`Fragment::set`].
    pub fn set(
        &self,
        key: impl Into<PathComponent>,
        value: impl Into<Value>,
    ) -> Result<(), DocumentError> {
        self.root().set(key, value)
    }

    /// Member removal from the root container. See [`Fragment::delete`].
    pub fn delete(&self, key: impl Into<PathComponent>) -> Result<(), LookupError> {
        self.root().delete(key)
    }

    pub(crate) fn with_root<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.shared.root.borrow())
    }
}

// Content equality; two handles on the same tree are trivially equal.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
            || *self.shared.root.borrow() == *other.shared.root.borrow()
    }
}

impl fmt::Display for Document {
    /// Compact JSON in stored member order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_root(|root| fmt::Display::fmt(root, f))
    }
}

/// A positional view over one node of a document's value tree.
///
/// Carries the path from the root (its last component is the key or index
/// within the parent) and resolves it on each access. Fragments do not own
/// tree data and are cheap to clone.
#[derive(Debug, Clone)]
pub struct Fragment {
    shared: Rc<Shared>,
    path: Vec<PathComponent>,
}

impl Fragment {
    /// The path from the document root to this fragment.
    #[must_use]
    pub fn path(&self) -> &[PathComponent] {
        &self.path
    }

    /// The key or index this fragment occupies in its parent, or `None`
    /// for the root.
    #[must_use]
    pub fn key(&self) -> Option<&PathComponent> {
        self.path.last()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// The parent fragment, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Fragment> {
        let (_, parent_path) = self.path.split_last()?;
        Some(Fragment {
            shared: self.shared.clone(),
            path: parent_path.to_vec(),
        })
    }

    /// A document handle for the tree this fragment points into.
    #[must_use]
    pub fn document(&self) -> Document {
        Document {
            shared: self.shared.clone(),
        }
    }

    /// The sub-schema governing this position, if the document has a
    /// schema and it describes this path.
    #[must_use]
    pub fn schema(&self) -> Option<serde_json::Value> {
        self.shared.schema.as_ref()?.resolve(&self.path).cloned()
    }

    /// A detached copy of the value at this position, as currently stored.
    ///
    /// The copy is a plain [`Value`]; mutating it does not touch the
    /// document. All document mutation goes through [`Fragment::set`] /
    /// [`Fragment::delete`] so schema checks fire.
    ///
    /// Fails if the path no longer resolves (an ancestor was removed or
    /// replaced with a scalar).
    pub fn value(&self) -> Result<Value, LookupError> {
        let root = self.shared.root.borrow();
        resolve(&root, &self.path).cloned()
    }

    /// Child fragment at `key`.
    ///
    /// Fails with [`LookupError::NotAContainer`] if this position holds a
    /// scalar, and [`LookupError::Missing`] if the member does not exist.
    pub fn get(&self, key: impl Into<PathComponent>) -> Result<Fragment, LookupError> {
        let component = key.into();
        {
            let root = self.shared.root.borrow();
            let node = resolve(&root, &self.path)?;
            child(node, &component)?;
        }
        let mut path = self.path.clone();
        path.push(component);
        Ok(Fragment {
            shared: self.shared.clone(),
            path,
        })
    }

    /// Deep lookup: child of child of ... along `path`.
    ///
    /// Pairs with the [`path!`](crate::path!) macro:
    /// `fragment.at(&path!["users", 0, "name"])`.
    pub fn at(&self, path: &[PathComponent]) -> Result<Fragment, LookupError> {
        let mut fragment = self.clone();
        for component in path {
            fragment = fragment.get(component.clone())?;
        }
        Ok(fragment)
    }

    /// Validated write of member `key` in the container at this position.
    ///
    /// The candidate is checked against the sub-schema resolved for the
    /// target position first; on rejection the tree is left untouched.
    /// Object writes replace an existing member in place or append a new
    /// one at the end; existing member order never changes. Array writes
    /// accept `index == len` as an append.
    pub fn set(
        &self,
        key: impl Into<PathComponent>,
        value: impl Into<Value>,
    ) -> Result<(), DocumentError> {
        let component = key.into();
        let value = value.into();
        // Shape check first so that indexing a scalar or a bad index kind
        // surfaces as a lookup failure, not a schema one.
        {
            let root = self.shared.root.borrow();
            let node = resolve(&root, &self.path)?;
            check_writable(node, &component)?;
        }
        if let Some(schema) = &self.shared.schema {
            let mut target = self.path.clone();
            target.push(component.clone());
            schema.check(&target, &value)?;
        }
        let mut root = self.shared.root.borrow_mut();
        let node = resolve_mut(&mut root, &self.path)?;
        commit(node, component, value).map_err(DocumentError::from)
    }

    /// Removes member `key` from the container at this position.
    ///
    /// Deleting an array element shifts later siblings down; fragments
    /// held on those siblings resolve to the shifted content afterwards.
    pub fn delete(&self, key: impl Into<PathComponent>) -> Result<(), LookupError> {
        let component = key.into();
        let mut root = self.shared.root.borrow_mut();
        let node = resolve_mut(&mut root, &self.path)?;
        match node {
            Value::Object(map) => {
                if let PathComponent::Key(k) = &component {
                    if map.remove(k.as_ref()).is_some() {
                        return Ok(());
                    }
                }
                Err(LookupError::Missing {
                    component,
                    kind: "object",
                })
            }
            Value::Array(items) => {
                if let PathComponent::Index(index) = component {
                    if index < items.len() {
                        items.remove(index);
                        return Ok(());
                    }
                }
                Err(LookupError::Missing {
                    component,
                    kind: "array",
                })
            }
            other => Err(LookupError::NotAContainer { kind: other.kind() }),
        }
    }

    /// Replaces the value at this fragment's own position, by delegating
    /// to the parent's [`set`](Fragment::set) rather than assigning through
    /// an unwrapped value, so validation and parent/key linkage hold.
    ///
    /// Fails with [`LookupError::RootHasNoParent`] on the root fragment;
    /// replacing the whole document is [`Document::set_root`].
    pub fn set_value(&self, value: impl Into<Value>) -> Result<(), DocumentError> {
        match self.path.split_last() {
            None => Err(LookupError::RootHasNoParent.into()),
            Some((component, parent_path)) => {
                let parent = Fragment {
                    shared: self.shared.clone(),
                    path: parent_path.to_vec(),
                };
                parent.set(component.clone(), value)
            }
        }
    }
}

fn resolve<'a>(mut node: &'a Value, path: &[PathComponent]) -> Result<&'a Value, LookupError> {
    for component in path {
        node = child(node, component)?;
    }
    Ok(node)
}

fn resolve_mut<'a>(
    mut node: &'a mut Value,
    path: &[PathComponent],
) -> Result<&'a mut Value, LookupError> {
    for component in path {
        node = child_mut(node, component)?;
    }
    Ok(node)
}

fn child<'a>(node: &'a Value, component: &PathComponent) -> Result<&'a Value, LookupError> {
    let found = match node {
        Value::Object(map) => match component {
            PathComponent::Key(key) => map.get(key.as_ref()),
            PathComponent::Index(_) => None,
        },
        Value::Array(items) => match component {
            PathComponent::Index(index) => items.get(*index),
            PathComponent::Key(_) => None,
        },
        other => return Err(LookupError::NotAContainer { kind: other.kind() }),
    };
    found.ok_or_else(|| LookupError::Missing {
        component: component.clone(),
        kind: node.kind(),
    })
}

fn child_mut<'a>(
    node: &'a mut Value,
    component: &PathComponent,
) -> Result<&'a mut Value, LookupError> {
    let kind = node.kind();
    let found = match node {
        Value::Object(map) => match component {
            PathComponent::Key(key) => map.get_mut(key.as_ref()),
            PathComponent::Index(_) => None,
        },
        Value::Array(items) => match component {
            PathComponent::Index(index) => items.get_mut(*index),
            PathComponent::Key(_) => None,
        },
        _ => return Err(LookupError::NotAContainer { kind }),
    };
    found.ok_or_else(|| LookupError::Missing {
        component: component.clone(),
        kind,
    })
}

fn check_writable(node: &Value, component: &PathComponent) -> Result<(), LookupError> {
    match node {
        Value::Object(_) => match component {
            PathComponent::Key(_) => Ok(()),
            PathComponent::Index(_) => Err(LookupError::Missing {
                component: component.clone(),
                kind: "object",
            }),
        },
        Value::Array(items) => match component {
            PathComponent::Index(index) if *index <= items.len() => Ok(()),
            _ => Err(LookupError::Missing {
                component: component.clone(),
                kind: "array",
            }),
        },
        other => Err(LookupError::NotAContainer { kind: other.kind() }),
    }
}

fn commit(node: &mut Value, component: PathComponent, value: Value) -> Result<(), LookupError> {
    match node {
        Value::Object(map) => match component {
            PathComponent::Key(key) => {
                map.insert(key.as_ref(), value);
                Ok(())
            }
            component @ PathComponent::Index(_) => Err(LookupError::Missing {
                component,
                kind: "object",
            }),
        },
        Value::Array(items) => match component {
            PathComponent::Index(index) if index < items.len() => {
                items[index] = value;
                Ok(())
            }
            PathComponent::Index(index) if index == items.len() => {
                items.push(value);
                Ok(())
            }
            component => Err(LookupError::Missing {
                component,
                kind: "array",
            }),
        },
        other => Err(LookupError::NotAContainer { kind: other.kind() }),
    }
}
