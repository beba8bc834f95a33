//! Archive reading API for pak archives.
//!
//! [`Archive`] is the single entry point: it opens an origin stream, answers
//! lookups by scanning the TOC lazily, and hands out [`EntryView`]s. Editing
//! and writing live in the crate's `edit` and `write` modules as further
//! `impl` blocks on the same type.
//!
//! # Example
//!
//! ```rust,no_run
//! use pakfile::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::open_path("data.pak")?;
//!
//!     // Only the TOC records up to "config.ini" are decoded here.
//!     if let Some(view) = archive.open_file("config.ini")? {
//!         println!("{} bytes", view.len());
//!         let _bytes = view.read()?;
//!     }
//!     Ok(())
//! }
//! ```

mod archive_open;
mod archive_query;
mod entry;
pub(crate) mod scanner;

pub use entry::{EntryView, EntryViews};

use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::PathBuf;
use std::rc::Rc;

use crate::edit::table::{EntryData, EntryState, EntryTable};
use crate::format::limits::ResourceLimits;
use crate::write::rebuild::{ContentSource, rebuild};
use crate::{Error, Result};

use scanner::TocScanner;

/// A pak archive: an origin stream overlaid with in-memory edits.
///
/// An archive is opened from a `.pak` file with [`Archive::open_path`], from
/// any seekable reader with [`Archive::open`], or created empty in memory
/// with [`Archive::new`]. Lookups scan the table of contents only as far as
/// needed. Edits are kept in memory until the archive is written.
///
/// The archive is single-threaded: its state is shared with the entry views
/// it hands out through reference counting, so it is neither `Send` nor
/// `Sync`. Dropping the archive disposes it, and views created from it fail
/// with [`Error::InvalidState`] from then on.
pub struct Archive<R = BufReader<File>> {
    pub(crate) inner: Rc<RefCell<ArchiveInner<R>>>,
}

/// The origin of an archive opened from a stream.
pub(crate) struct Origin<R> {
    /// Canonical path of the origin file, when opened from a path.
    pub(crate) path: Option<PathBuf>,
    pub(crate) scanner: TocScanner<R>,
}

/// Shared archive state.
pub(crate) struct ArchiveInner<R> {
    /// `None` for memory-only archives and after disposal.
    pub(crate) origin: Option<Origin<R>>,
    pub(crate) table: EntryTable,
    pub(crate) limits: ResourceLimits,
    pub(crate) dirty: bool,
    pub(crate) disposed: bool,
}

impl<R> Archive<R> {
    pub(crate) fn from_parts(origin: Option<Origin<R>>, limits: ResourceLimits) -> Self {
        // Without an origin there is nothing to copy verbatim.
        let dirty = origin.is_none();
        Self {
            inner: Rc::new(RefCell::new(ArchiveInner {
                origin,
                table: EntryTable::new(),
                limits,
                dirty,
                disposed: false,
            })),
        }
    }

    /// Borrows the state of an archive that has not been disposed.
    pub(crate) fn state(&self) -> Result<RefMut<'_, ArchiveInner<R>>> {
        let inner = self.inner.borrow_mut();
        inner.ensure_open()?;
        Ok(inner)
    }

    /// Releases the origin stream and marks the archive disposed.
    ///
    /// Calling `dispose` more than once is a no-op. Every other operation on
    /// a disposed archive, and on entry views created from it, fails with
    /// [`Error::InvalidState`].
    pub fn dispose(&mut self) {
        self.inner.borrow_mut().dispose();
    }

    /// Returns `true` once the archive has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }
}

impl<R> Drop for Archive<R> {
    fn drop(&mut self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.dispose(),
            Err(_) => log::warn!("archive dropped while its state was borrowed"),
        }
    }
}

impl<R> ArchiveInner<R> {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::disposed());
        }
        Ok(())
    }

    pub(crate) fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        match self.origin.take().and_then(|o| o.path) {
            Some(path) => log::debug!("disposing archive {}", path.display()),
            None => log::debug!("disposing archive"),
        }
        self.disposed = true;
    }
}

impl<R: Read + Seek> ArchiveInner<R> {
    /// Looks up the live content of `path`, scanning only as far as needed.
    ///
    /// A tombstone or an entry already in the table answers without touching
    /// the stream.
    pub(crate) fn find(&mut self, path: &[u8]) -> Result<Option<EntryData>> {
        if let Some(state) = self.table.get(path) {
            return Ok(match state {
                EntryState::Live(data) => Some(data.clone()),
                EntryState::Tombstone => None,
            });
        }
        if let Some(origin) = self.origin.as_mut() {
            origin
                .scanner
                .scan(&mut self.table, |record| record.path.as_bytes() == path)?;
        }
        Ok(self.table.get_live(path).cloned())
    }

    /// Scans every remaining TOC record into the table.
    pub(crate) fn preload_all(&mut self) -> Result<()> {
        if let Some(origin) = self.origin.as_mut() {
            origin.scanner.scan(&mut self.table, |_| false)?;
        }
        Ok(())
    }

    /// Reads the content described by `data`.
    pub(crate) fn read_data(&mut self, data: &EntryData) -> Result<Vec<u8>> {
        match data {
            EntryData::InMemory(bytes) => Ok(bytes.to_vec()),
            EntryData::OnDisk { offset, length } => {
                let origin = self.origin.as_mut().ok_or_else(no_origin)?;
                let mut buf = vec![0u8; *length as usize];
                origin.scanner.read_content_into(*offset, &mut buf)?;
                Ok(buf)
            }
        }
    }

    /// Produces the bytes a write would emit.
    ///
    /// A clean archive is copied verbatim from its origin. A dirty one is
    /// fully scanned and rebuilt from a single snapshot of the table.
    pub(crate) fn output_bytes(&mut self) -> Result<Vec<u8>> {
        if !self.dirty {
            let origin = self.origin.as_mut().ok_or_else(no_origin)?;
            let bytes = origin.scanner.read_all()?;
            log::debug!("copying archive verbatim: {} bytes", bytes.len());
            return Ok(bytes);
        }

        self.preload_all()?;
        let snapshot = self.table.snapshot();
        if snapshot.len() as u64 > self.limits.max_entries as u64 {
            return Err(Error::ResourceLimitExceeded(format!(
                "rebuilt archive would hold {} entries, limit is {}",
                snapshot.len(),
                self.limits.max_entries
            )));
        }
        let source = self
            .origin
            .as_mut()
            .map(|o| &mut o.scanner as &mut dyn ContentSource);
        rebuild(&snapshot, source)
    }
}

pub(crate) fn no_origin() -> Error {
    Error::InvalidState("archive has no origin stream".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn two_entry_archive() -> Vec<u8> {
        // Header, TOC for "a" (13 bytes) and "b" (13 bytes), then "x" and "yy".
        let mut data = Vec::new();
        for field in [0i32, 2, 26, 0, 42, 1, 1] {
            data.extend_from_slice(&field.to_le_bytes());
        }
        data.push(b'a');
        for field in [43i32, 2, 1] {
            data.extend_from_slice(&field.to_le_bytes());
        }
        data.push(b'b');
        data.extend_from_slice(b"xyy");
        data
    }

    #[test]
    fn test_memory_archive_is_dirty() {
        let archive: Archive<Cursor<Vec<u8>>> = Archive::from_parts(None, ResourceLimits::default());
        let inner = archive.inner.borrow();
        assert!(inner.dirty);
        assert!(inner.origin.is_none());
    }

    #[test]
    fn test_find_scans_lazily() {
        let archive = Archive::open(Cursor::new(two_entry_archive())).unwrap();
        let mut inner = archive.state().unwrap();

        let data = inner.find(b"a").unwrap().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(inner.origin.as_ref().unwrap().scanner.scanned(), 1);
        assert_eq!(inner.read_data(&data).unwrap(), b"x");

        assert!(inner.find(b"missing").unwrap().is_none());
        assert_eq!(inner.origin.as_ref().unwrap().scanner.scanned(), 2);
    }

    #[test]
    fn test_clean_output_is_verbatim() {
        let bytes = two_entry_archive();
        let archive = Archive::open(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(archive.state().unwrap().output_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut archive = Archive::open(Cursor::new(two_entry_archive())).unwrap();
        archive.dispose();
        archive.dispose();
        assert!(archive.is_disposed());
        assert!(archive.state().err().unwrap().is_disposed());
    }
}
