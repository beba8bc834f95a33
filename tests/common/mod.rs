//! Shared test utilities for integration tests.
//!
//! Archives are assembled byte by byte here rather than through the library,
//! so tests check the library against the format itself.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Size of the fixed header.
pub const HEADER_SIZE: usize = 16;

/// Builds archive bytes with the given reserved words.
///
/// Content is laid out after the TOC in record order.
pub fn build_archive_with_reserved(reserved: (i32, i32), entries: &[(&[u8], &[u8])]) -> Vec<u8> {
    let toc_size: usize = entries.iter().map(|(path, _)| 12 + path.len()).sum();

    let mut data = Vec::new();
    data.extend_from_slice(&reserved.0.to_le_bytes());
    data.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    data.extend_from_slice(&(toc_size as i32).to_le_bytes());
    data.extend_from_slice(&reserved.1.to_le_bytes());

    let mut offset = HEADER_SIZE + toc_size;
    for (path, content) in entries {
        push_record(&mut data, offset as i32, content.len() as i32, path);
        offset += content.len();
    }
    for (_, content) in entries {
        data.extend_from_slice(content);
    }
    data
}

/// Builds archive bytes with zeroed reserved words.
pub fn build_archive(entries: &[(&[u8], &[u8])]) -> Vec<u8> {
    build_archive_with_reserved((0, 0), entries)
}

/// Builds archive bytes from string paths.
pub fn build_archive_str(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let entries: Vec<(&[u8], &[u8])> = entries.iter().map(|(p, c)| (p.as_bytes(), *c)).collect();
    build_archive(&entries)
}

/// Appends one TOC record.
pub fn push_record(data: &mut Vec<u8>, offset: i32, length: i32, path: &[u8]) {
    data.extend_from_slice(&offset.to_le_bytes());
    data.extend_from_slice(&length.to_le_bytes());
    data.extend_from_slice(&(path.len() as i32).to_le_bytes());
    data.extend_from_slice(path);
}

/// Builds a header with arbitrary field values.
pub fn header(reserved0: i32, entry_count: i32, toc_size: i32, reserved1: i32) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE);
    for field in [reserved0, entry_count, toc_size, reserved1] {
        data.extend_from_slice(&field.to_le_bytes());
    }
    data
}

/// Reads the signed little-endian field at `pos`.
pub fn field(data: &[u8], pos: usize) -> i32 {
    i32::from_le_bytes(data[pos..pos + 4].try_into().unwrap())
}

/// A decoded TOC record: `(offset, length, path)`.
pub type Record = (i32, i32, Vec<u8>);

/// Decodes the TOC of well-formed archive bytes.
pub fn read_toc(data: &[u8]) -> Vec<Record> {
    let count = field(data, 4) as usize;
    let mut pos = HEADER_SIZE;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = field(data, pos);
        let length = field(data, pos + 4);
        let path_len = field(data, pos + 8) as usize;
        let path = data[pos + 12..pos + 12 + path_len].to_vec();
        records.push((offset, length, path));
        pos += 12 + path_len;
    }
    records
}

/// Returns the content of every record in TOC order.
pub fn read_contents(data: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
    read_toc(data)
        .into_iter()
        .map(|(offset, length, path)| {
            let start = offset as usize;
            (path, data[start..start + length as usize].to_vec())
        })
        .collect()
}

/// Writes `bytes` to `name` inside `dir` and returns the file path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
