//! Width-checked numeric conversions
//!
//! Any integer tag decodes into any integer width it fits. Floats never
//! decode into integers. Integers decode into floats only while the float
//! represents them exactly.

use crate::error::DecodeError;
use crate::value::{Number, NumericKind};

/// Largest integer magnitude an `f64` represents exactly (2^53)
const F64_EXACT: i128 = 1 << 53;

/// Largest integer magnitude an `f32` represents exactly (2^24)
const F32_EXACT: i128 = 1 << 24;

/// Decodes an integer of width `target`
pub fn integer_from<T: TryFrom<i128>>(n: &Number, target: NumericKind) -> Result<T, DecodeError> {
    let wide = n.as_i128().ok_or_else(|| DecodeError::ShapeMismatch {
        expected: target.name().to_string(),
        found: n.kind().name().to_string(),
    })?;
    T::try_from(wide).map_err(|_| DecodeError::Overflow {
        kind: target,
        value: wide.to_string(),
    })
}

/// Decodes a 64-bit float
pub fn f64_from(n: &Number) -> Result<f64, DecodeError> {
    match *n {
        Number::F64(v) => Ok(v),
        Number::F32(v) => Ok(f64::from(v)),
        other => exact_integer(&other, F64_EXACT, NumericKind::F64).map(|v| v as f64),
    }
}

/// Decodes a 32-bit float
pub fn f32_from(n: &Number) -> Result<f32, DecodeError> {
    match *n {
        Number::F32(v) => Ok(v),
        Number::F64(v) => {
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                return Err(DecodeError::Overflow {
                    kind: NumericKind::F32,
                    value: v.to_string(),
                });
            }
            Ok(v as f32)
        }
        other => exact_integer(&other, F32_EXACT, NumericKind::F32).map(|v| v as f32),
    }
}

fn exact_integer(n: &Number, limit: i128, target: NumericKind) -> Result<i128, DecodeError> {
    let wide = n.as_i128().ok_or_else(|| DecodeError::ShapeMismatch {
        expected: target.name().to_string(),
        found: n.kind().name().to_string(),
    })?;
    if wide.abs() > limit {
        return Err(DecodeError::Overflow {
            kind: target,
            value: wide.to_string(),
        });
    }
    Ok(wide)
}

/// Checks that `n` decodes into `kind` without overflow
pub fn check_fits(kind: NumericKind, n: &Number) -> Result<(), DecodeError> {
    match kind {
        NumericKind::I8 => integer_from::<i8>(n, kind).map(drop),
        NumericKind::I16 => integer_from::<i16>(n, kind).map(drop),
        NumericKind::I32 => integer_from::<i32>(n, kind).map(drop),
        NumericKind::I64 => integer_from::<i64>(n, kind).map(drop),
        NumericKind::U8 => integer_from::<u8>(n, kind).map(drop),
        NumericKind::U16 => integer_from::<u16>(n, kind).map(drop),
        NumericKind::U32 => integer_from::<u32>(n, kind).map(drop),
        NumericKind::U64 => integer_from::<u64>(n, kind).map(drop),
        NumericKind::F32 => f32_from(n).map(drop),
        NumericKind::F64 => f64_from(n).map(drop),
    }
}
