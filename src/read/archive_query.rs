//! Archive query methods.
//!
//! This module provides lookups, listing and extraction. Lookups scan the
//! TOC only as far as needed; counting and listing scan it to the end.

use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::format::header::ArchiveHeader;
use crate::{ArchivePath, Result};

use super::{Archive, EntryView, EntryViews};

impl<R: Read + Seek> Archive<R> {
    /// Opens the live entry at `path`, or returns `None` if there is none.
    ///
    /// If `path` is not known yet and TOC records remain, records are
    /// scanned until `path` is found or the TOC ends. A removed path
    /// answers `None` without scanning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`](crate::Error::CorruptArchive) if a
    /// scanned record is malformed and
    /// [`Error::InvalidState`](crate::Error::InvalidState) if the archive
    /// has been disposed.
    pub fn open_file(&self, path: impl AsRef<[u8]>) -> Result<Option<EntryView<R>>> {
        let path = path.as_ref();
        let mut inner = self.state()?;
        let Some(data) = inner.find(path)? else {
            return Ok(None);
        };
        let path = ArchivePath::from_decoded(path.to_vec());
        Ok(Some(EntryView::new(Rc::downgrade(&self.inner), path, data)))
    }

    /// Writes the entry at `path` to the host file `out_path`.
    ///
    /// Returns `false`, without touching `out_path`, if there is no live
    /// entry at `path`.
    pub fn extract(&self, path: impl AsRef<[u8]>, out_path: impl AsRef<Path>) -> Result<bool> {
        let bytes = {
            let mut inner = self.state()?;
            match inner.find(path.as_ref())? {
                Some(data) => inner.read_data(&data)?,
                None => return Ok(false),
            }
        };
        fs::write(out_path, bytes)?;
        Ok(true)
    }

    /// Returns the number of live entries.
    ///
    /// Scans the whole TOC on first use.
    pub fn count_files(&self) -> Result<usize> {
        let mut inner = self.state()?;
        inner.preload_all()?;
        Ok(inner.table.live_count())
    }

    /// Returns views of every live entry.
    ///
    /// The TOC is scanned to the end and the live entries are captured when
    /// this is called; each call starts a fresh pass. Entries appear in the
    /// order they were first seen, on disk or added.
    pub fn iterate_files(&self) -> Result<EntryViews<R>> {
        let mut inner = self.state()?;
        inner.preload_all()?;
        let views: Vec<EntryView<R>> = inner
            .table
            .snapshot()
            .into_iter()
            .map(|entry| EntryView::new(Rc::downgrade(&self.inner), entry.path, entry.data))
            .collect();
        Ok(EntryViews::new(views))
    }

    /// Scans every remaining TOC record.
    pub fn preload_all(&self) -> Result<()> {
        self.state()?.preload_all()
    }

    /// Returns `true` if writing will rebuild the archive rather than copy it.
    ///
    /// This and the other introspection getters below never fail: they
    /// keep answering after disposal, from state held in memory.
    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty
    }

    /// Returns the canonical path of the origin file.
    ///
    /// `None` for archives opened from a reader or created in memory, and
    /// after disposal.
    pub fn path(&self) -> Option<PathBuf> {
        let inner = self.inner.borrow();
        inner.origin.as_ref().and_then(|o| o.path.clone())
    }

    /// Returns the header as read from the origin stream.
    ///
    /// `None` for in-memory archives and after disposal.
    pub fn header(&self) -> Option<ArchiveHeader> {
        let inner = self.inner.borrow();
        inner.origin.as_ref().map(|o| *o.scanner.header())
    }

    /// Returns how many TOC records have been decoded so far.
    ///
    /// `0` for in-memory archives and after disposal.
    pub fn scanned_records(&self) -> u32 {
        let inner = self.inner.borrow();
        inner.origin.as_ref().map_or(0, |o| o.scanner.scanned())
    }

    /// Returns how many TOC records have not been decoded yet.
    ///
    /// `0` for in-memory archives and after disposal.
    pub fn pending_records(&self) -> u32 {
        let inner = self.inner.borrow();
        inner.origin.as_ref().map_or(0, |o| o.scanner.remaining())
    }
}
