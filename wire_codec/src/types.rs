//! Declared wire types
//!
//! A [`WireType`] is what a contract says a value should look like. The
//! router validates every inbound parameter payload against the declared
//! type before any handler sees it.

use crate::error::DecodeError;
use crate::numeric;
use crate::value::{NumericKind, WireValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared shape of a value crossing the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireType {
    /// No meaningful value (void results); encoded as null
    Unit,
    Bool,
    Number {
        kind: NumericKind,
    },
    Text,
    List {
        element: Box<WireType>,
    },
    Record {
        name: String,
        fields: Vec<FieldType>,
    },
    Nullable {
        inner: Box<WireType>,
    },
    /// String-tagged enumeration
    ///
    /// Validation only checks for text. Whether a tag is known is decided
    /// by the operation that consumes it, so a newer counterpart can add
    /// variants without every payload becoming malformed.
    Enum {
        name: String,
        tags: Vec<String>,
    },
}

/// One named field of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub name: String,
    #[serde(rename = "shape")]
    pub ty: WireType,
    pub required: bool,
}

impl FieldType {
    /// Declares a field; nullable fields are optional, everything else is required
    pub fn new(name: impl Into<String>, ty: WireType) -> Self {
        let required = !matches!(ty, WireType::Nullable { .. });
        Self {
            name: name.into(),
            ty,
            required,
        }
    }
}

impl WireType {
    /// Checks a value against this declared type
    ///
    /// Unknown record fields are ignored. Missing optional fields are fine.
    pub fn validate(&self, value: &WireValue) -> Result<(), DecodeError> {
        match (self, value) {
            (WireType::Unit, WireValue::Null) => Ok(()),
            (WireType::Bool, WireValue::Bool(_)) => Ok(()),
            (WireType::Number { kind }, WireValue::Number(n)) => numeric::check_fits(*kind, n),
            (WireType::Text, WireValue::Text(_)) => Ok(()),
            (WireType::Enum { .. }, WireValue::Text(_)) => Ok(()),
            (WireType::List { element }, WireValue::List(items)) => {
                for (index, item) in items.iter().enumerate() {
                    element.validate(item).map_err(|e| e.at_index(index))?;
                }
                Ok(())
            }
            (WireType::Record { fields, .. }, WireValue::Record(values)) => {
                for field in fields {
                    match values.get(&field.name) {
                        Some(value) => field
                            .ty
                            .validate(value)
                            .map_err(|e| e.in_field(&field.name))?,
                        None if field.required => {
                            return Err(DecodeError::MissingField {
                                field: field.name.clone(),
                            })
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            (WireType::Nullable { .. }, WireValue::Null) => Ok(()),
            (WireType::Nullable { inner }, other) => inner.validate(other),
            (expected, found) => Err(DecodeError::mismatch(expected.to_string(), found)),
        }
    }

    /// Checks if this type carries no value
    pub fn is_unit(&self) -> bool {
        matches!(self, WireType::Unit)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Unit => write!(f, "null"),
            WireType::Bool => write!(f, "bool"),
            WireType::Number { kind } => write!(f, "{}", kind),
            WireType::Text => write!(f, "text"),
            WireType::List { element } => write!(f, "list<{}>", element),
            WireType::Record { name, .. } => write!(f, "record {}", name),
            WireType::Nullable { inner } => write!(f, "{}?", inner),
            WireType::Enum { name, .. } => write!(f, "enum {}", name),
        }
    }
}
