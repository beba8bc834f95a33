//! Mutating operations on an archive.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;

use crate::read::{Archive, ArchiveInner};
use crate::{ArchivePath, Error, Result};

use super::table::{EntryData, EntryState};

impl<R: Read + Seek> Archive<R> {
    /// Adds a new file, failing if a live entry already exists at `path`.
    ///
    /// The whole TOC is scanned first so that an on-disk entry not seen yet
    /// is detected. A removed path can be added again.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`] if `path` holds a live entry
    /// - [`Error::InvalidArgument`] if the path or content exceeds the
    ///   archive's limits
    pub fn add(&mut self, path: impl AsRef<[u8]>, content: impl Into<Vec<u8>>) -> Result<()> {
        let mut inner = self.state()?;
        let path = inner.checked_path(path.as_ref())?;
        inner.preload_all()?;
        if inner.table.get_live(path.as_bytes()).is_some() {
            return Err(Error::AlreadyExists {
                path: path.to_string_lossy().into_owned(),
            });
        }
        inner.install_content(path, content.into())
    }

    /// Stores `content` at `path`, replacing any existing or removed entry.
    ///
    /// No TOC records are scanned.
    pub fn set(&mut self, path: impl AsRef<[u8]>, content: impl Into<Vec<u8>>) -> Result<()> {
        let mut inner = self.state()?;
        let path = inner.checked_path(path.as_ref())?;
        inner.install_content(path, content.into())
    }

    /// Stores the bytes read from `reader` at `path`, like [`set`](Self::set).
    ///
    /// The reader is consumed to completion. Returns the number of bytes
    /// imported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the content is longer than the
    /// archive's entry length limit; reading stops one byte past the limit.
    pub fn import(&mut self, path: impl AsRef<[u8]>, reader: impl Read) -> Result<u64> {
        let mut inner = self.state()?;
        let path = inner.checked_path(path.as_ref())?;

        let max = inner.limits.max_entry_length as u64;
        let mut content = Vec::new();
        reader.take(max + 1).read_to_end(&mut content)?;
        let imported = content.len() as u64;

        inner.install_content(path, content)?;
        Ok(imported)
    }

    /// Imports the host file `file` at `path`.
    pub fn import_path(&mut self, path: impl AsRef<[u8]>, file: impl AsRef<Path>) -> Result<u64> {
        let file = File::open(file)?;
        self.import(path, file)
    }

    /// Removes the entry at `path`.
    ///
    /// The path is hidden from lookups and from later TOC scanning, whether
    /// or not it existed. No TOC records are scanned.
    pub fn remove(&mut self, path: impl AsRef<[u8]>) -> Result<()> {
        let mut inner = self.state()?;
        let path = inner.checked_path(path.as_ref())?;
        log::trace!("remove '{}'", path);
        inner.table.install(path, EntryState::Tombstone);
        inner.dirty = true;
        Ok(())
    }

    /// Makes every later write rebuild the archive instead of copying it.
    pub fn force_rebuild_on_write(&mut self) -> Result<()> {
        self.state()?.dirty = true;
        Ok(())
    }
}

impl<R> ArchiveInner<R> {
    /// Validates a caller-supplied path against the archive's limits.
    ///
    /// The archive's `max_path_length` is the only bound, the same one TOC
    /// records are decoded with, so any path read from the archive can be
    /// edited.
    pub(crate) fn checked_path(&self, path: &[u8]) -> Result<ArchivePath> {
        if path.len() as u64 > self.limits.max_path_length as u64 {
            return Err(Error::InvalidArgument(format!(
                "path length {} exceeds limit {}",
                path.len(),
                self.limits.max_path_length
            )));
        }
        Ok(ArchivePath::from_decoded(path.to_vec()))
    }

    fn install_content(&mut self, path: ArchivePath, content: Vec<u8>) -> Result<()> {
        if content.len() as u64 > self.limits.max_entry_length as u64 {
            return Err(Error::InvalidArgument(format!(
                "content of '{}' is {} bytes, limit is {}",
                path,
                content.len(),
                self.limits.max_entry_length
            )));
        }
        // Scanning only adds live entries, so a new path on a full table
        // always ends up over the limit.
        let max_entries = self.limits.max_entries as usize;
        let is_new = self.table.get_live(path.as_bytes()).is_none();
        if is_new && self.table.live_count() >= max_entries {
            return Err(Error::InvalidArgument(format!(
                "adding '{}' would exceed the limit of {} entries",
                path, max_entries
            )));
        }
        log::trace!("set '{}': {} bytes", path, content.len());
        let data = EntryData::InMemory(Rc::from(content));
        self.table.install(path, EntryState::Live(data));
        self.dirty = true;
        Ok(())
    }
}
