//! String-tagged enumerations
//!
//! Enumerations cross the bridge as their canonical tag, never an ordinal,
//! so reordering variants on either side changes nothing on the wire.

use crate::codec::{WireDecode, WireEncode};
use crate::error::DecodeError;
use crate::types::WireType;
use crate::value::WireValue;
use std::fmt;
use std::marker::PhantomData;

/// An enumeration with a closed set of string tags
pub trait WireEnum: Sized + Copy {
    /// Name used in declared types and error messages
    const NAME: &'static str;

    fn tag(&self) -> &'static str;

    fn from_tag(tag: &str) -> Option<Self>;

    fn tags() -> &'static [&'static str];
}

/// Declared wire type of an enumeration
pub fn enum_wire_type<E: WireEnum>() -> WireType {
    WireType::Enum {
        name: E::NAME.to_string(),
        tags: E::tags().iter().map(|t| t.to_string()).collect(),
    }
}

/// Decodes a text tag into a known variant
pub fn decode_enum<E: WireEnum>(value: &WireValue) -> Result<E, DecodeError> {
    match value {
        WireValue::Text(tag) => E::from_tag(tag).ok_or_else(|| DecodeError::UnknownVariant {
            enumeration: E::NAME.to_string(),
            tag: tag.clone(),
        }),
        other => Err(DecodeError::mismatch(format!("enum {}", E::NAME), other)),
    }
}

/// An enumeration tag that has not been resolved yet
///
/// Decoding an `EnumTag` accepts any text, so the operation that owns the
/// enumeration decides how an unknown tag fails.
pub struct EnumTag<E> {
    tag: String,
    marker: PhantomData<fn() -> E>,
}

impl<E: WireEnum> EnumTag<E> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Resolves the tag to a known variant
    pub fn resolve(&self) -> Result<E, DecodeError> {
        E::from_tag(&self.tag).ok_or_else(|| DecodeError::UnknownVariant {
            enumeration: E::NAME.to_string(),
            tag: self.tag.clone(),
        })
    }
}

impl<E: WireEnum> From<E> for EnumTag<E> {
    fn from(variant: E) -> Self {
        Self::new(variant.tag())
    }
}

impl<E> Clone for EnumTag<E> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            marker: PhantomData,
        }
    }
}

impl<E> PartialEq for EnumTag<E> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl<E> Eq for EnumTag<E> {}

impl<E> fmt::Debug for EnumTag<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumTag").field(&self.tag).finish()
    }
}

impl<E: WireEnum> WireEncode for EnumTag<E> {
    fn wire_type() -> WireType {
        enum_wire_type::<E>()
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Text(self.tag.clone())
    }
}

impl<E: WireEnum> WireDecode for EnumTag<E> {
    fn from_wire(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Text(tag) => Ok(Self::new(tag.clone())),
            other => Err(DecodeError::mismatch(format!("enum {}", E::NAME), other)),
        }
    }
}

/// Declares a string-tagged enumeration together with its wire codec
///
/// The enum must derive `Clone` and `Copy` itself.
///
/// ```
/// use wire_codec::{wire_enum, WireEnum};
///
/// wire_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Direction {
///         Forward => "forward",
///         Backward => "backward",
///     }
/// }
///
/// assert_eq!(Direction::Backward.tag(), "backward");
/// assert_eq!(Direction::from_tag("forward"), Some(Direction::Forward));
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $tag:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $crate::WireEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant => $tag, )+
                }
            }

            fn from_tag(tag: &str) -> ::std::option::Option<Self> {
                match tag {
                    $( $tag => ::std::option::Option::Some(Self::$variant), )+
                    _ => ::std::option::Option::None,
                }
            }

            fn tags() -> &'static [&'static str] {
                &[ $( $tag ),+ ]
            }
        }

        impl $crate::WireEncode for $name {
            fn wire_type() -> $crate::WireType {
                $crate::enums::enum_wire_type::<Self>()
            }

            fn to_wire(&self) -> $crate::WireValue {
                $crate::WireValue::Text(
                    <Self as $crate::WireEnum>::tag(self).to_string(),
                )
            }
        }

        impl $crate::WireDecode for $name {
            fn from_wire(
                value: &$crate::WireValue,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                $crate::enums::decode_enum(value)
            }
        }
    };
}
