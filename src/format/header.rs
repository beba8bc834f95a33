//! Pak archive header structure and parsing.

use std::io::Read;

use super::HEADER_SIZE;
use super::limits::ResourceLimits;
use super::reader::{get_i32_le, put_i32_le};
use crate::{Error, Result};

/// The fixed 16-byte header at the start of every pak archive.
///
/// The two reserved words are opaque. They are kept as read so callers can
/// inspect them, and are written as zero when an archive is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveHeader {
    /// First reserved word.
    pub reserved0: i32,
    /// Number of TOC records that follow the header.
    pub entry_count: u32,
    /// Declared size of the TOC region in bytes.
    pub toc_byte_size: u32,
    /// Second reserved word.
    pub reserved1: i32,
}

impl ArchiveHeader {
    /// Creates a header for a freshly built archive (reserved words zeroed).
    pub fn new(entry_count: u32, toc_byte_size: u32) -> Self {
        Self {
            reserved0: 0,
            entry_count,
            toc_byte_size,
            reserved1: 0,
        }
    }

    /// Parses the header from the start of a reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] if:
    /// - Fewer than 16 bytes are available
    /// - The entry count or TOC size is negative
    /// - The entry count exceeds `limits.max_entries`
    pub fn parse<R: Read>(r: &mut R, limits: &ResourceLimits) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        r.read_exact(&mut buf)
            .map_err(|e| Error::from_read(e, 0, "archive header"))?;
        Self::decode(&buf, limits)
    }

    /// Decodes the header from its 16-byte encoding.
    pub fn decode(buf: &[u8; HEADER_SIZE as usize], limits: &ResourceLimits) -> Result<Self> {
        let field = |pos: usize| get_i32_le(buf, pos).unwrap_or_default();
        let reserved0 = field(0);
        let entry_count = field(4);
        let toc_byte_size = field(8);
        let reserved1 = field(12);

        if entry_count < 0 {
            return Err(Error::corrupt_archive(
                4,
                format!("negative entry count {}", entry_count),
            ));
        }
        if toc_byte_size < 0 {
            return Err(Error::corrupt_archive(
                8,
                format!("negative TOC size {}", toc_byte_size),
            ));
        }
        let entry_count = entry_count as u32;
        if entry_count > limits.max_entries {
            return Err(Error::corrupt_archive(
                4,
                format!(
                    "entry count {} exceeds limit {}",
                    entry_count, limits.max_entries
                ),
            ));
        }

        Ok(Self {
            reserved0,
            entry_count,
            toc_byte_size: toc_byte_size as u32,
            reserved1,
        })
    }

    /// Encodes the header into the first 16 bytes of `buf`.
    ///
    /// Returns the position just past the header.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than 16 bytes. Counts must already fit the
    /// format's signed fields; the builder checks this before encoding.
    pub fn encode_into(&self, buf: &mut [u8]) -> usize {
        let pos = put_i32_le(buf, 0, self.reserved0);
        let pos = put_i32_le(buf, pos, to_field(self.entry_count));
        let pos = put_i32_le(buf, pos, to_field(self.toc_byte_size));
        put_i32_le(buf, pos, self.reserved1)
    }

    /// Byte offset where the content region starts.
    pub fn content_start(&self) -> u64 {
        HEADER_SIZE + self.toc_byte_size as u64
    }
}

/// Converts a count to its on-disk signed representation.
#[inline]
pub(crate) fn to_field(value: u32) -> i32 {
    debug_assert!(value <= i32::MAX as u32, "{} overflows a signed field", value);
    value as i32
}
