//! Compact-array length prefix
//!
//! Lengths are encoded 7 bits per byte, least significant group first, with
//! the high bit set on every byte except the last. Values are limited to
//! `u16`, so an encoding never exceeds three bytes.

use crate::error::{Error, Result};

/// Longest valid encoding in bytes
pub const MAX_ENCODING_LENGTH: usize = 3;

/// Append the compact encoding of `len` to `out`
pub fn encode_length(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let mut rem = u16::try_from(len)
        .map_err(|_| Error::malformed(format!("length {} does not fit a compact array", len)))?;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Decode a compact length from the front of `bytes`, returning the value and
/// the number of bytes consumed
pub fn decode_length(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut value: u32 = 0;
    for (i, byte) in bytes.iter().take(MAX_ENCODING_LENGTH).enumerate() {
        let group = u32::from(byte & 0x7f);
        // alias encodings such as 0x80 0x00 are rejected
        if i > 0 && *byte == 0 {
            return Err(Error::malformed("non-canonical compact length"));
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            if value > u32::from(u16::MAX) {
                return Err(Error::malformed("compact length overflows u16"));
            }
            return Ok((value as usize, i + 1));
        }
        if i + 1 == MAX_ENCODING_LENGTH {
            return Err(Error::malformed("compact length longer than 3 bytes"));
        }
    }
    Err(Error::malformed("truncated compact length"))
}
