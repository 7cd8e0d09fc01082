//! Invocation paths
//!
//! An invocation path is the routing key of a bridge module. It is the only
//! thing the far side needs to know to address a module, so it must stay
//! stable across releases and unique on each side of the bridge.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while building an [`InvocationPath`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invocation path is empty")]
    Empty,

    #[error("Invocation path '{path}' must start with an ASCII letter")]
    BadStart { path: String },

    #[error("Invocation path '{path}' contains invalid character '{ch}'")]
    InvalidChar { path: String, ch: char },
}

/// Stable string identifying a module for routing purposes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvocationPath(String);

impl InvocationPath {
    /// Validates and wraps a path
    ///
    /// Valid paths start with an ASCII letter and contain only ASCII
    /// alphanumerics, `.`, `_` and `-`.
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        let mut chars = path.chars();
        match chars.next() {
            None => return Err(PathError::Empty),
            Some(first) if !first.is_ascii_alphabetic() => {
                return Err(PathError::BadStart { path });
            }
            Some(_) => {}
        }
        if let Some(ch) = path
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(PathError::InvalidChar { path, ch });
        }
        Ok(Self(path))
    }

    /// Wraps a path literal
    ///
    /// # Panics
    ///
    /// Panics if `path` is not valid. Intended for literals only, where the
    /// check is evaluated against a constant.
    pub fn from_static(path: &'static str) -> Self {
        assert!(is_valid(path), "invalid invocation path literal");
        Self(path.to_string())
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks a path without allocating; usable in constant contexts
pub const fn is_valid(path: &str) -> bool {
    let bytes = path.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_alphabetic() {
        return false;
    }
    let mut i = 1;
    while i < bytes.len() {
        let b = bytes[i];
        if !(b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-') {
            return false;
        }
        i += 1;
    }
    true
}

impl fmt::Display for InvocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InvocationPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for InvocationPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InvocationPath> for String {
    fn from(path: InvocationPath) -> Self {
        path.0
    }
}

impl AsRef<str> for InvocationPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
