//! Decode errors

use crate::value::{NumericKind, WireValue};
use thiserror::Error;

/// A wire value did not match the declared shape
///
/// Decode errors are always recoverable: the transport turns them into a
/// failed invocation, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("value {value} overflows {kind}")]
    Overflow { kind: NumericKind, value: String },

    #[error("unknown {enumeration} tag '{tag}'")]
    UnknownVariant { enumeration: String, tag: String },

    #[error("at {path}: {source}")]
    Field {
        path: String,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Creates a shape mismatch error for a value
    pub fn mismatch(expected: impl Into<String>, found: &WireValue) -> Self {
        DecodeError::ShapeMismatch {
            expected: expected.into(),
            found: found.shape_name().to_string(),
        }
    }

    /// Prefixes this error with a record field name
    pub fn in_field(self, field: &str) -> Self {
        self.prefixed(field.to_string())
    }

    /// Prefixes this error with a list index
    pub fn at_index(self, index: usize) -> Self {
        self.prefixed(format!("[{}]", index))
    }

    fn prefixed(self, segment: String) -> Self {
        match self {
            DecodeError::Field { path, source } => {
                let path = if path.starts_with('[') {
                    format!("{}{}", segment, path)
                } else {
                    format!("{}.{}", segment, path)
                };
                DecodeError::Field { path, source }
            }
            other => DecodeError::Field {
                path: segment,
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, without field context
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns the field path of this error, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::Field { path, .. } => Some(path),
            _ => None,
        }
    }
}
