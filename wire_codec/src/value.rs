//! Wire values and their JSON form

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Width and semantic tag of a number on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumericKind {
    /// Returns the wire name of this kind (`"i32"`, `"f64"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::I8 => "i8",
            NumericKind::I16 => "i16",
            NumericKind::I32 => "i32",
            NumericKind::I64 => "i64",
            NumericKind::U8 => "u8",
            NumericKind::U16 => "u16",
            NumericKind::U32 => "u32",
            NumericKind::U64 => "u64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
        }
    }

    /// Checks if this is a floating point kind
    pub fn is_float(&self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A number tagged with its width
///
/// JSON form: `{"kind":"i32","value":5}`. Non-finite floats have no JSON
/// number form and travel as text: `{"kind":"f64","value":"-Infinity"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(#[serde(with = "float_form::single")] f32),
    F64(#[serde(with = "float_form::double")] f64),
}

mod float_form {
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Form<T> {
        Number(T),
        Text(String),
    }

    fn special(v: f64) -> Option<&'static str> {
        if v.is_nan() {
            Some(NAN)
        } else if v == f64::INFINITY {
            Some(INFINITY)
        } else if v == f64::NEG_INFINITY {
            Some(NEG_INFINITY)
        } else {
            None
        }
    }

    fn parse_special<E: serde::de::Error>(text: &str) -> Result<f64, E> {
        match text {
            NAN => Ok(f64::NAN),
            INFINITY => Ok(f64::INFINITY),
            NEG_INFINITY => Ok(f64::NEG_INFINITY),
            other => Err(E::custom(format!("'{}' is not a float", other))),
        }
    }

    pub mod single {
        use super::*;

        pub fn serialize<S: Serializer>(v: &f32, s: S) -> Result<S::Ok, S::Error> {
            match special(f64::from(*v)) {
                Some(text) => s.serialize_str(text),
                None => s.serialize_f32(*v),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
            match Form::<f32>::deserialize(d)? {
                Form::Number(v) => Ok(v),
                Form::Text(text) => parse_special(&text).map(|v: f64| v as f32),
            }
        }
    }

    pub mod double {
        use super::*;

        pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
            match special(*v) {
                Some(text) => s.serialize_str(text),
                None => s.serialize_f64(*v),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
            match Form::<f64>::deserialize(d)? {
                Form::Number(v) => Ok(v),
                Form::Text(text) => parse_special(&text),
            }
        }
    }
}

impl Number {
    /// Returns the width tag carried by this number
    pub fn kind(&self) -> NumericKind {
        match self {
            Number::I8(_) => NumericKind::I8,
            Number::I16(_) => NumericKind::I16,
            Number::I32(_) => NumericKind::I32,
            Number::I64(_) => NumericKind::I64,
            Number::U8(_) => NumericKind::U8,
            Number::U16(_) => NumericKind::U16,
            Number::U32(_) => NumericKind::U32,
            Number::U64(_) => NumericKind::U64,
            Number::F32(_) => NumericKind::F32,
            Number::F64(_) => NumericKind::F64,
        }
    }

    /// Widens an integer to `i128`
    ///
    /// Returns `None` for floating point numbers.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::I8(v) => Some(v.into()),
            Number::I16(v) => Some(v.into()),
            Number::I32(v) => Some(v.into()),
            Number::I64(v) => Some(v.into()),
            Number::U8(v) => Some(v.into()),
            Number::U16(v) => Some(v.into()),
            Number::U32(v) => Some(v.into()),
            Number::U64(v) => Some(v.into()),
            Number::F32(_) | Number::F64(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::F32(v) => write!(f, "{}f32", v),
            Number::F64(v) => write!(f, "{}f64", v),
            other => match other.as_i128() {
                Some(v) => write!(f, "{}{}", v, other.kind()),
                None => write!(f, "?{}", other.kind()),
            },
        }
    }
}

/// A value restricted to the shapes both sides of the bridge can decode
///
/// JSON form is adjacently tagged: `{"shape":"text","value":"abc"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "lowercase")]
pub enum WireValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<WireValue>),
    Record(BTreeMap<String, WireValue>),
}

impl WireValue {
    /// Returns an empty record
    pub fn empty_record() -> Self {
        WireValue::Record(BTreeMap::new())
    }

    /// Returns the shape name used in error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Bool(_) => "bool",
            WireValue::Number(n) => n.kind().name(),
            WireValue::Text(_) => "text",
            WireValue::List(_) => "list",
            WireValue::Record(_) => "record",
        }
    }

    /// Checks if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// Returns the fields of a record value
    pub fn as_record(&self) -> Option<&BTreeMap<String, WireValue>> {
        match self {
            WireValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the text of a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WireValue::Text(text) => Some(text),
            _ => None,
        }
    }
}
