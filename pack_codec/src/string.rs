//! Fixed or variable width byte strings.
//!
//! With `bytes` set the encoding is exactly that long: shorter input is
//! right-padded by repeating `fill` (cut off where the width ends), longer
//! input is truncated. Without `bytes` the input is written as-is and a read
//! takes everything left in the source.

use crate::{CodecError, CodecOptions, Result};

/// Fixed width, if any.
pub fn width(options: &CodecOptions) -> Option<usize> {
    options.bytes
}

pub fn encode(value: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let Some(width) = options.bytes else {
        return Ok(value.to_vec());
    };
    if value.len() >= width {
        return Ok(value[..width].to_vec());
    }

    let fill = options.fill_or_default();
    if fill.is_empty() {
        return Err(CodecError::invalid("fill", "must not be empty"));
    }
    let mut out = Vec::new();
    out.try_reserve_exact(width)
        .map_err(|_| CodecError::invalid("bytes", format!("{width} bytes cannot be allocated")))?;
    out.extend_from_slice(value);
    out.extend(fill.iter().copied().cycle().take(width - value.len()));
    Ok(out)
}
