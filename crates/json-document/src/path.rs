use std::{fmt, sync::Arc};

pub type Key = Arc<str>;
pub type Index = usize;

/// A component in the path from the document root to a fragment.
///
/// Paths are sequences of keys or indices (for objects and arrays,
/// respectively) identifying the position of a fragment within its
/// document. Object keys are shared `Arc<str>` so that cloning a fragment
/// path is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    Key(Key),
    Index(Index),
}

impl PathComponent {
    /// Returns the index if this component is an index, otherwise `None`.
    #[must_use]
    pub fn as_index(&self) -> Option<Index> {
        if let Self::Index(v) = self { Some(*v) } else { None }
    }

    /// Returns the key if this component is a key, otherwise `None`.
    #[must_use]
    pub fn as_key(&self) -> Option<Key> {
        if let Self::Key(v) = self { Some(v.clone()) } else { None }
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key:?}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

// Convenient conversions so users can write `fragment.get(0)` and
// `fragment.get("foo")` alike.
macro_rules! impl_from_int_for_pathcomponent {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathComponent {
                fn from(i: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(i as Index)
                }
            }
        )*
    };
}

impl_from_int_for_pathcomponent!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<String> for PathComponent {
    fn from(s: String) -> Self {
        Self::Key(s.into())
    }
}

impl From<Key> for PathComponent {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as Index)
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> Self {
        PathComponent::Key(value.into())
    }
}

impl PathComponentFrom<String> for PathComponent {
    fn from_path_component(value: String) -> Self {
        PathComponent::Key(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_keys_and_not_indices() {
        assert_eq!(PathComponent::from("foo").to_string(), "\"foo\"");
        assert_eq!(PathComponent::from(3_usize).to_string(), "3");
    }

    #[test]
    fn accessors() {
        assert_eq!(PathComponent::from(2_usize).as_index(), Some(2));
        assert_eq!(PathComponent::from(2_usize).as_key(), None);
        assert_eq!(PathComponent::from("a").as_key().as_deref(), Some("a"));
    }
}
