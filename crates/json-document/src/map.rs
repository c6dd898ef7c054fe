//! Object member storage with a selectable ordering policy.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::value::Value;

/// The container behind [`Value::Object`].
///
/// `Ordered` keeps members in insertion order (textual order when the
/// document was parsed) through an [`IndexMap`]; `Unordered` trades that
/// guarantee for a plain hash map, which is slightly faster and lighter.
/// The variant is picked when the document is loaded (`retain_order`) and
/// sticks for the life of the container.
///
/// Replacing an existing member never moves it; inserting a new member
/// appends it. Removing an ordered member shifts later members down,
/// leaving their relative order intact.
#[derive(Debug, Clone)]
pub enum Map {
    Ordered(IndexMap<String, Value>),
    Unordered(AHashMap<String, Value>),
}

impl Map {
    /// An empty insertion-ordered map.
    #[must_use]
    pub fn new() -> Self {
        Self::Ordered(IndexMap::new())
    }

    /// An empty map with the ordering policy given by `retain_order`.
    #[must_use]
    pub fn with_order(retain_order: bool) -> Self {
        if retain_order {
            Self::Ordered(IndexMap::new())
        } else {
            Self::Unordered(AHashMap::new())
        }
    }

    /// Whether this map preserves insertion order.
    #[must_use]
    pub fn retains_order(&self) -> bool {
        matches!(self, Self::Ordered(_))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Ordered(map) => map.get(key),
            Self::Unordered(map) => map.get(key),
        }
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Self::Ordered(map) => map.get_mut(key),
            Self::Unordered(map) => map.get_mut(key),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a member, returning the previous value if the key existed.
    ///
    /// In ordered maps an existing key keeps its position and a new key is
    /// appended at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        match self {
            Self::Ordered(map) => map.insert(key.into(), value),
            Self::Unordered(map) => map.insert(key.into(), value),
        }
    }

    /// Removes a member, returning its value if the key existed.
    ///
    /// Ordered maps shift the remaining members down (`shift_remove`), so
    /// sibling order survives the deletion.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Self::Ordered(map) => map.shift_remove(key),
            Self::Unordered(map) => map.remove(key),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(map) => map.len(),
            Self::Unordered(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates members in storage order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        match self {
            Self::Ordered(map) => Iter::Ordered(map.iter()),
            Self::Unordered(map) => Iter::Unordered(map.iter()),
        }
    }

    /// Iterates member keys in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs of a [`Map`].
pub enum Iter<'a> {
    Ordered(indexmap::map::Iter<'a, String, Value>),
    Unordered(std::collections::hash_map::Iter<'a, String, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Ordered(iter) => iter.next().map(|(k, v)| (k.as_str(), v)),
            Self::Unordered(iter) => iter.next().map(|(k, v)| (k.as_str(), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Ordered(iter) => iter.size_hint(),
            Self::Unordered(iter) => iter.size_hint(),
        }
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Content equality, independent of ordering policy and storage order. A
// faithful round trip is asserted on serialized text, not via `==`.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self::Ordered(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Map {
    fn from(entries: [(&str, Value); N]) -> Self {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }
}
