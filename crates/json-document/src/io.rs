//! Loading and saving documents.
//!
//! `load`/`loads` parse JSON text into a [`Document`]; `dump`/`dumps`
//! serialize one back out. With the defaults (`retain_order` on load,
//! `sort_keys` off on save), a load, modify, save cycle reproduces member
//! order and number text of everything it did not touch.

use std::io::{Read, Write};

use crate::{codec, document::Document, error::DocumentError, schema::Schema, value::Value};

/// Options for [`load`] and [`loads`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to decode object members into insertion-ordered maps, so a
    /// later save reproduces the textual order of the source. Disabling
    /// this decodes into plain hash maps, and member order becomes
    /// unspecified.
    ///
    /// # Default
    ///
    /// `true`
    pub retain_order: bool,

    /// Schema to attach to the loaded document. Every write through the
    /// document's fragments is validated against it.
    ///
    /// # Default
    ///
    /// `None`
    pub schema: Option<Schema>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            retain_order: true,
            schema: None,
        }
    }
}

/// Options for [`dump`] and [`dumps`].
///
/// Formatting policy only; no option here ever changes the value tree.
#[derive(Debug, Clone, Copy)]
pub struct SaveOptions {
    /// Whether output is meant to be read by humans: multi-line, 2-space
    /// indentation, a space after each colon. Disabling this produces
    /// compact single-line output.
    ///
    /// # Default
    ///
    /// `true`
    pub human_readable: bool,

    /// Whether to emit object members in sorted key order instead of
    /// stored order. Useful for predictable diagnostic output; leave off
    /// when a load-modify-save cycle must not perturb the document's
    /// structure.
    ///
    /// # Default
    ///
    /// `false`
    pub sort_keys: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            human_readable: true,
            sort_keys: false,
        }
    }
}

impl SaveOptions {
    /// Compact, stored-order output.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            human_readable: false,
            sort_keys: false,
        }
    }
}

/// Parses a document from a string.
///
/// Fails with [`DocumentError::Parse`] when the text is not well-formed
/// JSON; no partial document is produced.
pub fn loads(text: &str, options: &LoadOptions) -> Result<Document, DocumentError> {
    let value = codec::parse(text, options.retain_order)?;
    Ok(Document::new(value, options.schema.clone()))
}

/// Parses a document from a reader.
///
/// Same as [`loads`] but reads the text from `reader` first; I/O failures
/// surface as [`DocumentError::Io`].
pub fn load(mut reader: impl Read, options: &LoadOptions) -> Result<Document, DocumentError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    loads(&text, options)
}

/// Serializes a document to a string.
#[must_use]
pub fn dumps(document: &Document, options: SaveOptions) -> String {
    document.with_root(|root| codec::to_string(root, options))
}

/// Serializes a document into a writer.
///
/// Applies the same formatting rules as [`dumps`].
pub fn dump(
    writer: impl Write,
    document: &Document,
    options: SaveOptions,
) -> Result<(), DocumentError> {
    document.with_root(|root| codec::write(root, writer, options))?;
    Ok(())
}

/// Serializes a bare value to a string.
#[must_use]
pub fn dumps_value(value: &Value, options: SaveOptions) -> String {
    codec::to_string(value, options)
}

/// Serializes a bare value into a writer.
pub fn dump_value(
    writer: impl Write,
    value: &Value,
    options: SaveOptions,
) -> Result<(), DocumentError> {
    codec::write(value, writer, options)?;
    Ok(())
}
