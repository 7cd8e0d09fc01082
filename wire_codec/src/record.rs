//! Named-field records
//!
//! Records are the only way structured data crosses the bridge. Parameter
//! payloads are always records, never positional tuples.

use crate::codec::{WireDecode, WireEncode};
use crate::error::DecodeError;
use crate::value::WireValue;
use std::collections::BTreeMap;

/// Reads typed fields out of a record value
pub struct RecordReader<'a> {
    fields: &'a BTreeMap<String, WireValue>,
}

impl<'a> RecordReader<'a> {
    /// Opens a record; any other shape is a mismatch
    pub fn new(value: &'a WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Record(fields) => Ok(Self { fields }),
            other => Err(DecodeError::mismatch("record", other)),
        }
    }

    /// Decodes one field
    ///
    /// Absent fields fall back to [`WireDecode::when_missing`]; fields the
    /// reader never asks for are ignored.
    pub fn field<T: WireDecode>(&self, name: &str) -> Result<T, DecodeError> {
        match self.fields.get(name) {
            Some(value) => T::from_wire(value).map_err(|e| e.in_field(name)),
            None => T::when_missing().ok_or_else(|| DecodeError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    /// Checks if a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Builds a record value field by field
#[derive(Debug, Default)]
pub struct RecordWriter {
    fields: BTreeMap<String, WireValue>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an encoded field
    pub fn field<T: WireEncode>(mut self, name: &str, value: &T) -> Self {
        self.fields.insert(name.to_string(), value.to_wire());
        self
    }

    pub fn finish(self) -> WireValue {
        WireValue::Record(self.fields)
    }
}

/// Declares a record struct together with its wire codec
///
/// Each field names its wire key explicitly, so Rust field names can follow
/// Rust conventions while the wire keeps the contract's spelling.
///
/// ```
/// use wire_codec::{wire_record, WireDecode};
///
/// wire_record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Reset {
///         pub text: String => "text",
///         pub read_only: bool => "readOnly",
///         pub label: Option<String> => "label",
///     }
/// }
///
/// let wire = wire_codec::encode(&Reset {
///     text: "abc".to_string(),
///     read_only: true,
///     label: None,
/// });
/// let back = Reset::from_wire(&wire).unwrap();
/// assert!(back.read_only);
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::WireEncode for $name {
            fn wire_type() -> $crate::WireType {
                $crate::WireType::Record {
                    name: ::std::string::String::from(stringify!($name)),
                    fields: ::std::vec![
                        $( $crate::FieldType::new($wire, <$ty as $crate::WireEncode>::wire_type()) ),*
                    ],
                }
            }

            fn to_wire(&self) -> $crate::WireValue {
                $crate::RecordWriter::new()
                    $( .field($wire, &self.$field) )*
                    .finish()
            }
        }

        impl $crate::WireDecode for $name {
            #[allow(unused_variables)]
            fn from_wire(
                value: &$crate::WireValue,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let record = $crate::RecordReader::new(value)?;
                ::std::result::Result::Ok(Self {
                    $( $field: record.field($wire)?, )*
                })
            }
        }
    };
}
