//! Low-level binary reading and writing utilities for pak format parsing.

use std::io::{self, Read};

/// Reads exact number of bytes into a new vector.
///
/// Callers must bound `count` before calling; this allocates `count` bytes
/// up front.
pub fn read_bytes<R: Read>(r: &mut R, count: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; count];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Writes a signed 32-bit little-endian integer into `buf` at `pos`.
///
/// Returns the position just past the written value.
///
/// # Panics
///
/// Panics if `buf` is shorter than `pos + 4`.
#[inline]
pub fn put_i32_le(buf: &mut [u8], pos: usize, value: i32) -> usize {
    buf[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
    pos + 4
}

/// Decodes a signed 32-bit little-endian integer from `buf` at `pos`.
///
/// Returns `None` if fewer than 4 bytes remain.
#[inline]
pub fn get_i32_le(buf: &[u8], pos: usize) -> Option<i32> {
    let bytes = buf.get(pos..pos.checked_add(4)?)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
