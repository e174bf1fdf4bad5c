//! IEEE-754 float codec.
//!
//! `double` stores the full 8-byte layout; `single` narrows through `f32`
//! first, losing precision silently the same way an `as` cast does. NaN and
//! the infinities are not special-cased.

use crate::{CodecError, CodecOptions, Endian, Precision, Result};

/// Encoded size for the options' precision.
pub fn width(options: &CodecOptions) -> usize {
    options.precision_or_default().width()
}

pub fn encode(value: f64, options: &CodecOptions) -> Vec<u8> {
    let endian = options.endian_or_default();
    match (options.precision_or_default(), endian) {
        (Precision::Single, Endian::Little) => (value as f32).to_le_bytes().to_vec(),
        (Precision::Single, _) => (value as f32).to_be_bytes().to_vec(),
        (Precision::Double, Endian::Little) => value.to_le_bytes().to_vec(),
        (Precision::Double, _) => value.to_be_bytes().to_vec(),
    }
}

/// Decodes exactly [`width`] bytes.
pub fn decode(raw: &[u8], options: &CodecOptions) -> Result<f64> {
    let little = options.endian_or_default() == Endian::Little;
    let mismatch = || CodecError::WidthMismatch {
        expected: width(options),
        found: raw.len(),
    };
    match options.precision_or_default() {
        Precision::Single => {
            let bytes: [u8; 4] = raw.try_into().map_err(|_| mismatch())?;
            let v = if little {
                f32::from_le_bytes(bytes)
            } else {
                f32::from_be_bytes(bytes)
            };
            Ok(f64::from(v))
        }
        Precision::Double => {
            let bytes: [u8; 8] = raw.try_into().map_err(|_| mismatch())?;
            Ok(if little {
                f64::from_le_bytes(bytes)
            } else {
                f64::from_be_bytes(bytes)
            })
        }
    }
}
