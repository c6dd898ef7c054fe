//! Error taxonomy: parse, lookup, validation, plus an umbrella type.
//!
//! No error is swallowed and none triggers an internal retry; `set`
//! validates before its single commit point, so a failed write leaves the
//! tree untouched and the caller free to retry with a corrected value.

use thiserror::Error;

use crate::path::PathComponent;

/// Any error surfaced by this crate.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The source text is not well-formed JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: Box<str>,
    line: usize,
    column: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<Box<str>>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// One-based line of the offending input.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column of the offending input.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Indexing failed: the value at the position is not a container, or the
/// requested member does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Indexed into a scalar (null, boolean, number, or string).
    #[error("cannot index into {kind} value")]
    NotAContainer { kind: &'static str },
    /// The key is absent, the index is out of range, or the component kind
    /// does not match the container (a key into an array, an index into an
    /// object).
    #[error("no member {component} in {kind} value")]
    Missing {
        component: PathComponent,
        kind: &'static str,
    },
    /// The root fragment has no parent to replace its value through.
    #[error("the root fragment has no parent")]
    RootHasNoParent,
}

/// A proposed write does not satisfy the schema resolved for its position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: Box<str>,
}

impl ValidationError {
    pub(crate) fn new(message: impl Into<Box<str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<jsonschema::ValidationError<'_>> for ValidationError {
    fn from(err: jsonschema::ValidationError<'_>) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_messages() {
        let err = LookupError::NotAContainer { kind: "number" };
        assert_eq!(err.to_string(), "cannot index into number value");

        let err = LookupError::Missing {
            component: PathComponent::from("count"),
            kind: "object",
        };
        assert_eq!(err.to_string(), "no member \"count\" in object value");

        let err = LookupError::Missing {
            component: PathComponent::from(7_usize),
            kind: "array",
        };
        assert_eq!(err.to_string(), "no member 7 in array value");
    }

    #[test]
    fn parse_error_carries_location() {
        let err = crate::codec::parse("{\n  \"a\": }", true).unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.column() > 0);
    }
}
