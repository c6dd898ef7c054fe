//! Accessor sugar over the document indexing protocol: the [`AsDocument`]
//! trait and the `bridge!` macro.

use crate::document::Document;

/// Implemented by types that expose a [`Document`] to bridge accessors.
pub trait AsDocument {
    fn document(&self) -> &Document;
}

impl AsDocument for Document {
    fn document(&self) -> &Document {
        self
    }
}

/// Generates accessor methods bound to fixed document member keys.
///
/// Wrapper types that hold a [`Document`](crate::Document) (and implement
/// [`AsDocument`](crate::AsDocument)) get plain Rust methods in three
/// flavors mirroring the indexing protocol:
///
/// - `fragment`: returns the [`Fragment`](crate::Fragment) handle itself;
/// - `readonly`: returns the unwrapped [`Value`](crate::Value);
/// - `readwrite`: value getter plus a setter and a deleter.
///
/// The bound key is fixed when the accessor is defined and is independent
/// of the method name, so keys that are not valid identifiers (hyphenated,
/// say) bind fine. Setters delegate to the container-level
/// [`set`](crate::Document::set), never to an assignment through an
/// unwrapped value, so schema validation always fires.
///
/// ```
/// use json_document::{bridge, AsDocument, Document, Map, Value};
///
/// struct Config {
///     doc: Document,
/// }
///
/// impl AsDocument for Config {
///     fn document(&self) -> &Document {
///         &self.doc
///     }
/// }
///
/// bridge! {
///     impl Config {
///         readonly schema_version => "schema-version";
///         readwrite title (set_title, delete_title) => "title";
///     }
/// }
///
/// let config = Config {
///     doc: Document::new(Map::new(), None),
/// };
/// config.set_title("hello")?;
/// assert_eq!(config.title()?, Value::from("hello"));
/// config.delete_title()?;
/// assert!(config.title().is_err());
/// # Ok::<(), json_document::DocumentError>(())
/// ```
#[macro_export]
macro_rules! bridge {
    (impl $target:ty {
        $( $kind:ident $name:ident $( ( $setter:ident, $deleter:ident ) )? => $key:literal; )*
    }) => {
        impl $target {
            $( $crate::bridge!(@method $kind $name $( ($setter, $deleter) )? => $key); )*
        }
    };
    (@method fragment $name:ident => $key:literal) => {
        pub fn $name(
            &self,
        ) -> ::core::result::Result<$crate::Fragment, $crate::LookupError> {
            $crate::AsDocument::document(self).get($key)
        }
    };
    (@method readonly $name:ident => $key:literal) => {
        pub fn $name(&self) -> ::core::result::Result<$crate::Value, $crate::LookupError> {
            $crate::AsDocument::document(self).get($key)?.value()
        }
    };
    (@method readwrite $name:ident ($setter:ident, $deleter:ident) => $key:literal) => {
        pub fn $name(&self) -> ::core::result::Result<$crate::Value, $crate::LookupError> {
            $crate::AsDocument::document(self).get($key)?.value()
        }

        pub fn $setter(
            &self,
            value: impl ::core::convert::Into<$crate::Value>,
        ) -> ::core::result::Result<(), $crate::DocumentError> {
            $crate::AsDocument::document(self).set($key, value)
        }

        pub fn $deleter(&self) -> ::core::result::Result<(), $crate::LookupError> {
            $crate::AsDocument::document(self).delete($key)
        }
    };
}
