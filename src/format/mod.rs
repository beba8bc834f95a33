//! Pak archive format constants and the binary layout codec.
//!
//! A pak archive is laid out as three consecutive regions:
//!
//! ```text
//! +----------------------+  offset 0
//! | header (16 bytes)    |  reserved0, entry_count, toc_byte_size, reserved1
//! +----------------------+  offset 16
//! | TOC records          |  entry_count x [offset][length][path_len][path]
//! +----------------------+  offset 16 + toc_byte_size
//! | content              |  raw bytes, one span per entry
//! +----------------------+
//! ```
//!
//! Every integer is a 4-byte signed value. Record offsets are absolute
//! positions from the start of the file. Paths are raw bytes, not
//! null-terminated, with no encoding.

pub mod header;
pub mod limits;
pub mod reader;
pub mod toc;

/// Size of the archive header in bytes.
pub const HEADER_SIZE: u64 = 16;

/// Size of the fixed part of a TOC record (offset, length, path length).
pub const TOC_RECORD_FIXED_SIZE: u64 = 12;

/// Largest admissible path length or entry length (128 MiB).
///
/// Any declared length above this is treated as corruption before a buffer
/// sized by it is allocated.
pub const MAX_FIELD_LENGTH: u32 = 128 << 20;

/// Required file extension for archives opened by path (without the dot).
pub const ARCHIVE_EXTENSION: &str = "pak";

/// Largest archive the format can address, since offsets are signed 32-bit.
pub const MAX_ARCHIVE_SIZE: u64 = i32::MAX as u64;
