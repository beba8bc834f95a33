//! Two-pass archive rebuild.
//!
//! The output is laid out as header, TOC, then content in TOC order. Sizes
//! are computed from the snapshot up front, so the output buffer is
//! allocated once and every offset is known before any content is copied.

use crate::edit::table::{EntryData, LiveEntry};
use crate::format::header::ArchiveHeader;
use crate::format::toc::{encode_record, encoded_len};
use crate::format::{HEADER_SIZE, MAX_ARCHIVE_SIZE};
use crate::{Error, Result};

/// Random-access source of on-disk entry content.
pub(crate) trait ContentSource {
    /// Fills `buf` with the bytes at absolute `offset` in the origin.
    fn read_content_into(&mut self, offset: u32, buf: &mut [u8]) -> Result<()>;
}

/// Serializes `entries` into a fresh archive.
///
/// Both passes walk the same slice, so the offsets written in the TOC always
/// match where the content lands. On-disk entries are read from `source`
/// straight into their output span.
pub(crate) fn rebuild(
    entries: &[LiveEntry],
    mut source: Option<&mut dyn ContentSource>,
) -> Result<Vec<u8>> {
    let toc_size: u64 = entries.iter().map(|e| encoded_len(e.path.len())).sum();
    let content_size: u64 = entries.iter().map(|e| e.data.len() as u64).sum();
    let total = HEADER_SIZE + toc_size + content_size;
    if total > MAX_ARCHIVE_SIZE {
        return Err(Error::ResourceLimitExceeded(format!(
            "rebuilt archive would be {} bytes, format maximum is {}",
            total, MAX_ARCHIVE_SIZE
        )));
    }

    let mut buf = vec![0u8; total as usize];

    // Pass 1: header and TOC. All values fit the signed fields since the
    // whole archive does.
    let header = ArchiveHeader::new(entries.len() as u32, toc_size as u32);
    let mut pos = header.encode_into(&mut buf);
    let mut offset = (HEADER_SIZE + toc_size) as u32;
    for entry in entries {
        let length = entry.data.len();
        pos = encode_record(&mut buf, pos, offset, length, entry.path.as_bytes());
        offset += length;
    }
    debug_assert_eq!(pos as u64, HEADER_SIZE + toc_size);

    // Pass 2: content.
    for entry in entries {
        let end = pos + entry.data.len() as usize;
        let span = &mut buf[pos..end];
        match &entry.data {
            EntryData::InMemory(bytes) => span.copy_from_slice(bytes),
            EntryData::OnDisk { offset, .. } => match source.as_deref_mut() {
                Some(source) => source.read_content_into(*offset, span)?,
                None => {
                    return Err(Error::InvalidState(format!(
                        "entry '{}' refers to an origin stream that is not available",
                        entry.path
                    )));
                }
            },
        }
        pos = end;
    }

    log::debug!(
        "rebuilt archive: {} entries, TOC {} bytes, {} bytes total",
        entries.len(),
        toc_size,
        total
    );
    Ok(buf)
}
