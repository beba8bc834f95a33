//! Lazy TOC scanning.
//!
//! The scanner owns the origin stream. Records are decoded strictly in file
//! order and only as far as a caller needs them, so looking up one entry
//! costs time proportional to its position in the TOC rather than to the
//! size of the archive.
//!
//! The scanner also owns the stream cursor. Between calls the stream is
//! always positioned at the next unread TOC record; content reads seek away
//! through [`TocScanner::detached`] which puts the cursor back afterwards,
//! whether or not the read succeeded.

use std::io::{self, Read, Seek, SeekFrom};

use crate::edit::table::EntryTable;
use crate::format::HEADER_SIZE;
use crate::format::TOC_RECORD_FIXED_SIZE;
use crate::format::header::ArchiveHeader;
use crate::format::limits::ResourceLimits;
use crate::format::toc::TocRecord;
use crate::write::rebuild::ContentSource;
use crate::{Error, Result};

/// Incremental reader of the TOC of one origin stream.
pub(crate) struct TocScanner<R> {
    reader: R,
    header: ArchiveHeader,
    limits: ResourceLimits,
    stream_len: u64,
    /// Records decoded so far.
    scanned: u32,
    /// Stream position of the next record.
    position: u64,
    /// Set when seeking back to `position` failed; the next parse re-seeks.
    cursor_lost: bool,
}

impl<R: Read + Seek> TocScanner<R> {
    /// Reads the header and positions the cursor on the first TOC record.
    pub(crate) fn new(mut reader: R, limits: ResourceLimits) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        let header = ArchiveHeader::parse(&mut reader, &limits)?;

        // Every record takes at least its fixed fields; a count that cannot
        // fit in the file is rejected before any record is read.
        let min_toc = header.entry_count as u64 * TOC_RECORD_FIXED_SIZE;
        if HEADER_SIZE + min_toc > stream_len {
            return Err(Error::corrupt_archive(
                4,
                format!(
                    "{} entries need at least {} TOC bytes, file has {}",
                    header.entry_count,
                    min_toc,
                    stream_len.saturating_sub(HEADER_SIZE)
                ),
            ));
        }

        log::debug!(
            "opened archive: {} entries, TOC {} bytes, stream {} bytes",
            header.entry_count,
            header.toc_byte_size,
            stream_len
        );

        Ok(Self {
            reader,
            header,
            limits,
            stream_len,
            scanned: 0,
            position: HEADER_SIZE,
            cursor_lost: false,
        })
    }

    /// Scans records into `table` until `stop` returns true or the TOC ends.
    ///
    /// Each decoded record is inserted only if its path is not in the table
    /// yet, so tombstones and in-memory entries are never overwritten. `stop`
    /// sees every decoded record, inserted or not.
    ///
    /// Returns `true` if scanning stopped early because of `stop`.
    pub(crate) fn scan<F>(&mut self, table: &mut EntryTable, mut stop: F) -> Result<bool>
    where
        F: FnMut(&TocRecord) -> bool,
    {
        if self.is_exhausted() {
            return Ok(false);
        }

        let start = self.scanned;
        while !self.is_exhausted() {
            let record = self.next_record()?;
            let inserted = table.insert_scanned(record.path.clone(), record.offset, record.length);
            log::trace!(
                "TOC record {}: '{}' at {:#x}, {} bytes{}",
                self.scanned - 1,
                record.path,
                record.offset,
                record.length,
                if inserted { "" } else { " (shadowed)" }
            );
            if stop(&record) {
                log::debug!(
                    "scan stopped early after {} records ({} of {} scanned)",
                    self.scanned - start,
                    self.scanned,
                    self.header.entry_count
                );
                return Ok(true);
            }
        }

        self.check_toc_size();
        log::debug!(
            "scan finished: {} records, {} paths known",
            self.scanned,
            table.len()
        );
        Ok(false)
    }

    /// Decodes the record at the cursor and advances past it.
    fn next_record(&mut self) -> Result<TocRecord> {
        if self.cursor_lost {
            self.reader.seek(SeekFrom::Start(self.position))?;
            self.cursor_lost = false;
        }

        let record = match TocRecord::parse(&mut self.reader, self.position, &self.limits) {
            Ok(record) => record,
            Err(e) => {
                // Leave the cursor on the failed record; a retry fails the
                // same way.
                self.restore_cursor();
                return Err(e);
            }
        };

        if record.content_end() > self.stream_len {
            self.restore_cursor();
            return Err(Error::corrupt_archive(
                self.position,
                format!(
                    "entry '{}' spans {:#x}..{:#x}, past end of file at {:#x}",
                    record.path,
                    record.offset,
                    record.content_end(),
                    self.stream_len
                ),
            ));
        }

        self.position += record.encoded_len();
        self.scanned += 1;
        Ok(record)
    }

    fn check_toc_size(&self) {
        let consumed = self.position - HEADER_SIZE;
        if consumed != self.header.toc_byte_size as u64 {
            log::warn!(
                "TOC size mismatch: header declares {} bytes, records use {}",
                self.header.toc_byte_size,
                consumed
            );
        }
    }

    /// Seeks back to the next unread record, flagging the cursor on failure.
    fn restore_cursor(&mut self) {
        if let Err(e) = self.reader.seek(SeekFrom::Start(self.position)) {
            log::warn!(
                "failed to restore TOC cursor to {:#x}: {}",
                self.position,
                e
            );
            self.cursor_lost = true;
        }
    }

    /// Runs an out-of-band operation on the stream, then restores the cursor.
    fn detached<T>(&mut self, op: impl FnOnce(&mut R) -> io::Result<T>) -> io::Result<T> {
        let result = op(&mut self.reader);
        let restored = self.reader.seek(SeekFrom::Start(self.position));
        if restored.is_err() {
            self.cursor_lost = true;
        }
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Reads the whole origin stream, for verbatim copies.
    pub(crate) fn read_all(&mut self) -> Result<Vec<u8>> {
        let capacity = self.stream_len as usize;
        let bytes = self.detached(|r| {
            r.seek(SeekFrom::Start(0))?;
            let mut buf = Vec::with_capacity(capacity);
            r.read_to_end(&mut buf)?;
            Ok(buf)
        })?;
        Ok(bytes)
    }

    /// The parsed header.
    pub(crate) fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Number of records scanned so far.
    pub(crate) fn scanned(&self) -> u32 {
        self.scanned
    }

    /// Number of records not scanned yet.
    pub(crate) fn remaining(&self) -> u32 {
        self.header.entry_count - self.scanned
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.scanned >= self.header.entry_count
    }
}

impl<R: Read + Seek> ContentSource for TocScanner<R> {
    fn read_content_into(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        self.detached(|r| {
            r.seek(SeekFrom::Start(offset as u64))?;
            r.read_exact(buf)
        })
        .map_err(|e| Error::from_read(e, offset as u64, "entry content"))
    }
}
