//! Entry views.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Weak;

use crate::edit::table::EntryData;
use crate::{ArchivePath, Error, Result};

use super::ArchiveInner;

/// A handle to one live entry of an [`Archive`](crate::Archive).
///
/// A view captures the entry's content location when it is created, so it
/// keeps reading the same content even if the path is later replaced or
/// removed in the archive. It does not keep the archive alive: once the
/// archive is disposed or dropped, [`read`](EntryView::read) and
/// [`write_to`](EntryView::write_to) fail with [`Error::InvalidState`]. The
/// path and length were captured at creation and stay available.
pub struct EntryView<R> {
    archive: Weak<RefCell<ArchiveInner<R>>>,
    path: ArchivePath,
    data: EntryData,
}

impl<R> EntryView<R> {
    pub(crate) fn new(
        archive: Weak<RefCell<ArchiveInner<R>>>,
        path: ArchivePath,
        data: EntryData,
    ) -> Self {
        Self {
            archive,
            path,
            data,
        }
    }

    /// The entry's path.
    pub fn path(&self) -> &ArchivePath {
        &self.path
    }

    /// Content length in bytes.
    pub fn len(&self) -> u32 {
        self.data.len()
    }

    /// Returns `true` for zero-length content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Read + Seek> EntryView<R> {
    /// Reads the entry's content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the archive has been disposed or
    /// dropped, and [`Error::CorruptArchive`] if the content cannot be read
    /// in full from the origin stream.
    pub fn read(&self) -> Result<Vec<u8>> {
        let archive = self.archive.upgrade().ok_or_else(Error::disposed)?;
        let mut inner = archive.borrow_mut();
        inner.ensure_open()?;
        inner.read_data(&self.data)
    }

    /// Writes the entry's content to the host file `out_path`.
    pub fn write_to(&self, out_path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.read()?;
        fs::write(out_path, bytes)?;
        Ok(())
    }
}

impl<R> fmt::Debug for EntryView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryView")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

/// Iterator over the views returned by
/// [`Archive::iterate_files`](crate::Archive::iterate_files).
///
/// The set of entries is fixed when the iterator is created.
pub struct EntryViews<R> {
    views: std::vec::IntoIter<EntryView<R>>,
}

impl<R> EntryViews<R> {
    pub(crate) fn new(views: Vec<EntryView<R>>) -> Self {
        Self {
            views: views.into_iter(),
        }
    }
}

impl<R> Iterator for EntryViews<R> {
    type Item = EntryView<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.views.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.views.size_hint()
    }
}

impl<R> ExactSizeIterator for EntryViews<R> {}
