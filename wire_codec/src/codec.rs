//! Typed mapping between domain values and wire values

use crate::error::DecodeError;
use crate::numeric;
use crate::types::WireType;
use crate::value::{Number, NumericKind, WireValue};

/// A domain type with a total mapping onto exactly one wire shape
pub trait WireEncode {
    /// Declared wire type of every value of this type
    fn wire_type() -> WireType;

    /// Encodes this value
    fn to_wire(&self) -> WireValue;
}

/// A domain type that can be rebuilt from its wire shape
pub trait WireDecode: Sized {
    /// Decodes a value, failing on any shape mismatch
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError>;

    /// Value used when a record field of this type is absent
    ///
    /// `None` means the field is required.
    fn when_missing() -> Option<Self> {
        None
    }
}

/// Encodes a domain value
pub fn encode<T: WireEncode>(value: &T) -> WireValue {
    value.to_wire()
}

/// Decodes a wire value as the declared type `T`
pub fn decode<T: WireDecode>(value: &WireValue) -> Result<T, DecodeError> {
    T::from_wire(value)
}

impl WireEncode for () {
    fn wire_type() -> WireType {
        WireType::Unit
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Null
    }
}

impl WireDecode for () {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Null => Ok(()),
            other => Err(DecodeError::mismatch("null", other)),
        }
    }
}

impl WireEncode for bool {
    fn wire_type() -> WireType {
        WireType::Bool
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Bool(*self)
    }
}

impl WireDecode for bool {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Bool(b) => Ok(*b),
            other => Err(DecodeError::mismatch("bool", other)),
        }
    }
}

impl WireEncode for String {
    fn wire_type() -> WireType {
        WireType::Text
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Text(self.clone())
    }
}

impl WireDecode for String {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Text(text) => Ok(text.clone()),
            other => Err(DecodeError::mismatch("text", other)),
        }
    }
}

macro_rules! integer_codec {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl WireEncode for $ty {
            fn wire_type() -> WireType {
                WireType::Number { kind: NumericKind::$variant }
            }

            fn to_wire(&self) -> WireValue {
                WireValue::Number(Number::$variant(*self))
            }
        }

        impl WireDecode for $ty {
            fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
                match value {
                    WireValue::Number(n) => numeric::integer_from(n, NumericKind::$variant),
                    other => Err(DecodeError::mismatch(NumericKind::$variant.name(), other)),
                }
            }
        }
    )*};
}

integer_codec! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

impl WireEncode for f32 {
    fn wire_type() -> WireType {
        WireType::Number {
            kind: NumericKind::F32,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Number(Number::F32(*self))
    }
}

impl WireDecode for f32 {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Number(n) => numeric::f32_from(n),
            other => Err(DecodeError::mismatch("f32", other)),
        }
    }
}

impl WireEncode for f64 {
    fn wire_type() -> WireType {
        WireType::Number {
            kind: NumericKind::F64,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Number(Number::F64(*self))
    }
}

impl WireDecode for f64 {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Number(n) => numeric::f64_from(n),
            other => Err(DecodeError::mismatch("f64", other)),
        }
    }
}

impl<T: WireEncode> WireEncode for Vec<T> {
    fn wire_type() -> WireType {
        WireType::List {
            element: Box::new(T::wire_type()),
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::List(self.iter().map(WireEncode::to_wire).collect())
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| T::from_wire(item).map_err(|e| e.at_index(index)))
                .collect(),
            other => Err(DecodeError::mismatch("list", other)),
        }
    }
}

impl<T: WireEncode> WireEncode for Option<T> {
    fn wire_type() -> WireType {
        WireType::Nullable {
            inner: Box::new(T::wire_type()),
        }
    }

    fn to_wire(&self) -> WireValue {
        match self {
            Some(value) => value.to_wire(),
            None => WireValue::Null,
        }
    }
}

impl<T: WireDecode> WireDecode for Option<T> {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Null => Ok(None),
            other => T::from_wire(other).map(Some),
        }
    }

    fn when_missing() -> Option<Self> {
        Some(None)
    }
}
