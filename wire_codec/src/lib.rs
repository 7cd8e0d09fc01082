//! # Wire Value Codec
//!
//! Converts domain values into the small closed set of shapes both sides of
//! the editor bridge understand, and back.
//!
//! ## Philosophy
//!
//! - **Closed shapes**: null, bool, number, text, list, record. Nothing else crosses.
//! - **Width is data**: every number carries its width tag, so a 64-bit native
//!   runtime and a JavaScript engine agree on range and truncation.
//! - **Named, not positional**: records are keyed by field name and enums by
//!   string tag, so reordering either side never breaks the other.
//! - **Decode never panics**: every mismatch is a [`DecodeError`] value.
//!
//! ## Example
//!
//! ```
//! use wire_codec::{decode, encode, wire_record};
//!
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Hover {
//!         pub x: f64 => "clientX",
//!         pub y: f64 => "clientY",
//!     }
//! }
//!
//! let hover = Hover { x: 1.5, y: 2.0 };
//! let wire = encode(&hover);
//! assert_eq!(decode::<Hover>(&wire).unwrap(), hover);
//! ```

pub mod codec;
pub mod enums;
pub mod error;
pub mod numeric;
pub mod record;
pub mod types;
pub mod value;

pub use codec::{decode, encode, WireDecode, WireEncode};
pub use enums::{EnumTag, WireEnum};
pub use error::DecodeError;
pub use record::{RecordReader, RecordWriter};
pub use types::{FieldType, WireType};
pub use value::{Number, NumericKind, WireValue};

/// The generic "integer" domain type.
///
/// Both runtimes represent a 32-bit signed integer exactly, so it is the
/// width every contract uses when it just says "integer".
pub type DomainInt = i32;
