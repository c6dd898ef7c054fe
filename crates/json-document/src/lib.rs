//! A live, mutable in-memory model of a JSON document.
//!
//! [`loads`]/[`load`] parse JSON text into a [`Document`] whose nodes are
//! addressed through [`Fragment`] handles: positional views supporting
//! indexed reads ([`Fragment::get`], [`Fragment::value`]) and validated
//! in-place writes ([`Fragment::set`], [`Fragment::delete`]). Attach a
//! [`Schema`] at load time and every write is checked against the schema
//! node governing its position before it commits.
//!
//! Documents round-trip faithfully: object member order and the exact
//! decimal text of numbers survive a load/save cycle untouched, so
//! modifying one member does not perturb the rest of the file.
//!
//! ```
//! use json_document::{dumps, loads, LoadOptions, SaveOptions};
//!
//! let doc = loads(
//!     r#"{"b": 1, "a": 0.30000000000000004}"#,
//!     &LoadOptions::default(),
//! )?;
//! doc.set("b", 2)?;
//! let out = dumps(&doc, SaveOptions::compact());
//! assert_eq!(out, r#"{"b":2,"a":0.30000000000000004}"#);
//! # Ok::<(), json_document::DocumentError>(())
//! ```

mod bridge;
mod codec;
mod document;
mod error;
mod io;
mod map;
mod number;
mod path;
mod schema;
mod value;

pub use bridge::AsDocument;
pub use document::{Document, Fragment};
pub use error::{DocumentError, LookupError, ParseError, ValidationError};
pub use io::{LoadOptions, SaveOptions, dump, dump_value, dumps, dumps_value, load, loads};
pub use map::Map;
pub use number::Number;
pub use path::{Index, Key, PathComponent, PathComponentFrom};
pub use schema::Schema;
pub use value::{Array, Value};

/// Builds a `Vec<PathComponent>` from a heterogeneous list of keys and
/// indices.
///
/// ```
/// use json_document::{path, PathComponent};
///
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        #[allow(unused_imports)]
        use $crate::PathComponentFrom;
        ::std::vec![$($crate::PathComponent::from_path_component($elem)),*]
    }};
}
