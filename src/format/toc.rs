//! TOC record structure and parsing.
//!
//! Each record is `[offset: i32][length: i32][path_len: i32][path bytes]`.

use std::io::Read;

use super::TOC_RECORD_FIXED_SIZE;
use super::header::to_field;
use super::limits::ResourceLimits;
use super::reader::{get_i32_le, put_i32_le, read_bytes};
use crate::{ArchivePath, Error, Result};

/// One decoded table-of-contents record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocRecord {
    /// Absolute byte position of the content from the start of the file.
    pub offset: u32,
    /// Content length in bytes.
    pub length: u32,
    /// Entry path.
    pub path: ArchivePath,
}

impl TocRecord {
    /// Parses one record. `at` is the stream position of the record, used
    /// for error reporting.
    ///
    /// The path length and content length are checked against `limits`
    /// before the path buffer is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] if a field is negative, a length
    /// exceeds its limit, or the stream ends inside the record.
    pub fn parse<R: Read>(r: &mut R, at: u64, limits: &ResourceLimits) -> Result<Self> {
        let mut fixed = [0u8; TOC_RECORD_FIXED_SIZE as usize];
        r.read_exact(&mut fixed)
            .map_err(|e| Error::from_read(e, at, "TOC record"))?;
        let field = |pos: usize| get_i32_le(&fixed, pos).unwrap_or_default();
        let (offset, length, path_len) = (field(0), field(4), field(8));

        if offset < 0 || length < 0 || path_len < 0 {
            return Err(Error::corrupt_archive(
                at,
                format!(
                    "negative TOC field (offset {}, length {}, path length {})",
                    offset, length, path_len
                ),
            ));
        }
        let (offset, length, path_len) = (offset as u32, length as u32, path_len as u32);

        if path_len > limits.max_path_length {
            return Err(Error::corrupt_archive(
                at + 8,
                format!(
                    "path length {} exceeds limit {}",
                    path_len, limits.max_path_length
                ),
            ));
        }
        if length > limits.max_entry_length {
            return Err(Error::corrupt_archive(
                at + 4,
                format!(
                    "entry length {} exceeds limit {}",
                    length, limits.max_entry_length
                ),
            ));
        }

        let path = read_bytes(r, path_len as usize)
            .map_err(|e| Error::from_read(e, at + TOC_RECORD_FIXED_SIZE, "TOC path"))?;

        Ok(Self {
            offset,
            length,
            path: ArchivePath::from_decoded(path),
        })
    }

    /// Size of this record on disk.
    pub fn encoded_len(&self) -> u64 {
        encoded_len(self.path.len())
    }

    /// Position one past the end of this record's content span.
    pub fn content_end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }

    /// Encodes this record into `buf` at `pos`, returning the position after it.
    pub fn encode_into(&self, buf: &mut [u8], pos: usize) -> usize {
        encode_record(buf, pos, self.offset, self.length, self.path.as_bytes())
    }
}

/// Size on disk of a record whose path is `path_len` bytes long.
#[inline]
pub fn encoded_len(path_len: usize) -> u64 {
    TOC_RECORD_FIXED_SIZE + path_len as u64
}

/// Encodes a record from its parts into `buf` at `pos`.
///
/// Returns the position after the record.
///
/// # Panics
///
/// Panics if `buf` is too short. Values must fit the format's signed fields.
pub fn encode_record(buf: &mut [u8], pos: usize, offset: u32, length: u32, path: &[u8]) -> usize {
    let pos = put_i32_le(buf, pos, to_field(offset));
    let pos = put_i32_le(buf, pos, to_field(length));
    let pos = put_i32_le(buf, pos, to_field(path.len() as u32));
    buf[pos..pos + path.len()].copy_from_slice(path);
    pos + path.len()
}
