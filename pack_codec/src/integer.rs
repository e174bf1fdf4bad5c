//! Integer codec.
//!
//! Values are arbitrary-precision [`Integer`]s. Encoding works on byte limbs
//! of the magnitude rather than machine words, so any width is handled the
//! same way: the low-order `bytes` limbs are kept (silent wraparound for
//! values that do not fit), negative values are stored in two's complement,
//! and `endian` only decides the limb order on the wire.

use malachite::Integer;

use crate::{CodecError, CodecOptions, Endian, Result};

/// Minimum width used when `bytes` is not given.
pub const DEFAULT_WIDTH: usize = 4;

pub fn is_negative(value: &Integer) -> bool {
    *value < Integer::from(0)
}

/// Little-endian byte limbs of `|value|`; empty for zero.
pub fn magnitude_limbs(value: &Integer) -> Vec<u8> {
    let base = Integer::from(256u32);
    let mut rest = if is_negative(value) {
        -value.clone()
    } else {
        value.clone()
    };

    let mut limbs = Vec::new();
    while rest > Integer::from(0) {
        let limb = &rest % &base;
        limbs.push(u8::try_from(&limb).unwrap_or(0));
        rest = &rest / &base;
    }
    limbs
}

/// Smallest number of bytes that represents `value` under the given
/// signedness. Zero needs one byte.
pub fn min_width(value: &Integer, signed: bool) -> usize {
    let limbs = magnitude_limbs(value);
    let Some(&top) = limbs.last() else {
        return 1;
    };
    let n = limbs.len();
    if top & 0x80 == 0 || !signed {
        return n;
    }
    // -2^(8n-1) is the one magnitude with the top bit set that still fits
    let is_min = is_negative(value) && top == 0x80 && limbs[..n - 1].iter().all(|&b| b == 0);
    if is_min { n } else { n + 1 }
}

/// Width used when writing `value`: the explicit `bytes`, or the smallest
/// width holding the value but never less than [`DEFAULT_WIDTH`].
pub fn write_width(value: &Integer, options: &CodecOptions) -> Result<usize> {
    match options.bytes {
        Some(0) => Err(CodecError::invalid("bytes", "integer width must be at least 1")),
        Some(n) => Ok(n),
        None => {
            let signed = options.signed.unwrap_or_else(|| is_negative(value));
            Ok(min_width(value, signed).max(DEFAULT_WIDTH))
        }
    }
}

/// Width consumed when reading: the explicit `bytes` or [`DEFAULT_WIDTH`].
pub fn read_width(options: &CodecOptions) -> Result<usize> {
    match options.bytes {
        Some(0) => Err(CodecError::invalid("bytes", "integer width must be at least 1")),
        Some(n) => Ok(n),
        None => Ok(DEFAULT_WIDTH),
    }
}

/// Signedness must be explicit when reading; nothing on the wire says.
pub fn read_signed(options: &CodecOptions) -> Result<bool> {
    options
        .signed
        .ok_or_else(|| CodecError::invalid("signed", "must be set explicitly when reading"))
}

/// Encodes `value` into exactly [`write_width`] bytes.
pub fn encode(value: &Integer, options: &CodecOptions) -> Result<Vec<u8>> {
    let width = write_width(value, options)?;
    let mut limbs = magnitude_limbs(value);
    limbs
        .try_reserve_exact(width.saturating_sub(limbs.len()))
        .map_err(|_| CodecError::invalid("bytes", format!("{width} bytes cannot be allocated")))?;
    // truncates to the low-order limbs or zero-extends
    limbs.resize(width, 0);
    if is_negative(value) {
        twos_complement(&mut limbs);
    }
    if options.endian_or_default() == Endian::Big {
        limbs.reverse();
    }
    Ok(limbs)
}

/// Decodes `raw` using the options' endianness and mandatory signedness.
pub fn decode(raw: &[u8], options: &CodecOptions) -> Result<Integer> {
    let signed = read_signed(options)?;
    Ok(decode_with(raw, options.endian_or_default(), signed))
}

/// Decodes `raw` as one integer of `raw.len()` bytes.
pub fn decode_with(raw: &[u8], endian: Endian, signed: bool) -> Integer {
    let mut limbs = raw.to_vec();
    if endian.resolve() == Endian::Big {
        limbs.reverse();
    }

    let negative = signed && limbs.last().is_some_and(|&b| b & 0x80 != 0);
    if negative {
        twos_complement(&mut limbs);
    }

    let base = Integer::from(256u32);
    let mut acc = Integer::from(0);
    for &limb in limbs.iter().rev() {
        acc = acc * &base + Integer::from(limb);
    }
    if negative { -acc } else { acc }
}

/// In-place two's complement of little-endian limbs (invert, add one).
fn twos_complement(limbs: &mut [u8]) {
    let mut carry = true;
    for limb in limbs.iter_mut() {
        let (sum, overflow) = (!*limb).overflowing_add(u8::from(carry));
        *limb = sum;
        carry = overflow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> CodecOptions {
        CodecOptions::new()
    }

    #[test]
    fn test_default_width_is_four_big_endian() {
        assert_eq!(encode(&Integer::from(6), &opts()).unwrap(), [0, 0, 0, 6]);
    }

    #[test]
    fn test_little_endian_three_bytes() {
        let o = opts().with_bytes(3).with_endian(Endian::Little);
        assert_eq!(encode(&Integer::from(258), &o).unwrap(), [2, 1, 0]);
        assert_eq!(
            decode(&[2, 1, 0], &o.with_signed(false)).unwrap(),
            Integer::from(258)
        );
    }

    #[test]
    fn test_minus_one_reinterpreted_by_signedness() {
        let raw = encode(&Integer::from(-1), &opts().with_bytes(3)).unwrap();
        assert_eq!(raw, [0xff, 0xff, 0xff]);
        assert_eq!(decode_with(&raw, Endian::Big, false), Integer::from((1 << 24) - 1));
        assert_eq!(decode_with(&raw, Endian::Big, true), Integer::from(-1));
    }

    #[test]
    fn test_truncation_keeps_low_order_bytes() {
        let o = opts().with_bytes(2);
        assert_eq!(encode(&Integer::from(0x123456), &o).unwrap(), [0x34, 0x56]);

        // (1 << 69) + 1 in four bytes is the same as 1
        let big = Integer::from(1u128 << 69) + Integer::from(1);
        let four = opts().with_bytes(4);
        assert_eq!(
            encode(&big, &four).unwrap(),
            encode(&Integer::from(1), &four).unwrap()
        );
    }

    #[test]
    fn test_wide_values() {
        let value = Integer::from(42u128 << (8 * 15));
        let o = opts().with_bytes(16);
        let raw = encode(&value, &o).unwrap();
        let mut expected = vec![42u8];
        expected.extend([0u8; 15]);
        assert_eq!(raw, expected);
        assert_eq!(decode(&raw, &o.with_signed(true)).unwrap(), value);
    }

    #[test]
    fn test_default_width_grows_past_four() {
        let big = Integer::from(1u128 << 69) + Integer::from(1);
        let raw = encode(&big, &opts()).unwrap();
        assert_eq!(raw.len(), 9);
        assert_eq!(decode_with(&raw, Endian::Big, false), big);
    }

    #[test]
    fn test_min_width() {
        assert_eq!(min_width(&Integer::from(0), false), 1);
        assert_eq!(min_width(&Integer::from(255), false), 1);
        assert_eq!(min_width(&Integer::from(255), true), 2);
        assert_eq!(min_width(&Integer::from(-128), true), 1);
        assert_eq!(min_width(&Integer::from(-129), true), 2);
        assert_eq!(min_width(&Integer::from(-32768), true), 2);
    }

    #[test]
    fn test_read_requires_signedness() {
        assert!(matches!(
            decode(&[0, 0, 0, 1], &opts()),
            Err(CodecError::InvalidOption { key: "signed", .. })
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(encode(&Integer::from(1), &opts().with_bytes(0)).is_err());
        assert!(read_width(&opts().with_bytes(0)).is_err());
    }

    #[test]
    fn test_unallocatable_width_is_an_option_error() {
        assert!(matches!(
            encode(&Integer::from(1), &opts().with_bytes(usize::MAX)),
            Err(CodecError::InvalidOption { key: "bytes", .. })
        ));
    }
}
