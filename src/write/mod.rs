//! Archive writing.
//!
//! Writing produces the complete output in memory before the destination is
//! touched, so a failed write never leaves a half-written archive behind.
//! A clean archive is copied byte for byte from its origin; an edited one is
//! rebuilt from the entry table.
//!
//! # Example
//!
//! ```rust,no_run
//! use pakfile::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     // Build a new archive in memory.
//!     let mut archive = Archive::new();
//!     archive.add("readme.txt", b"hello".to_vec())?;
//!     archive.write("new.pak")?;
//!
//!     // Edit an archive in place.
//!     let mut archive = Archive::open_path("new.pak")?;
//!     archive.set("readme.txt", b"hello again".to_vec())?;
//!     archive.write_and_dispose("new.pak")?;
//!     Ok(())
//! }
//! ```

pub(crate) mod rebuild;

use std::fs;
use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::read::{Archive, ArchiveInner};
use crate::{Error, Result};

impl<R: Read + Seek> Archive<R> {
    /// Writes the archive to `out_path`.
    ///
    /// An archive with no edits is copied verbatim from its origin. Otherwise
    /// the whole TOC is scanned and a fresh archive is built. The archive
    /// stays open and can be written again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if `out_path` is the origin file. The
    /// origin is still being read from; use
    /// [`write_and_dispose`](Self::write_and_dispose) to replace it.
    pub fn write(&self, out_path: impl AsRef<Path>) -> Result<()> {
        let out_path = out_path.as_ref();
        let bytes = {
            let mut inner = self.state()?;
            if inner.is_origin_path(out_path) {
                return Err(Error::InvalidState(format!(
                    "cannot write to '{}' while it is the open origin; use write_and_dispose",
                    out_path.display()
                )));
            }
            inner.output_bytes()?
        };
        fs::write(out_path, &bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), out_path.display());
        Ok(())
    }

    /// Writes the archive to any writer. Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<u64> {
        let bytes = self.state()?.output_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(bytes.len() as u64)
    }

    /// Builds the output, disposes the archive, then writes `out_path`.
    ///
    /// The origin stream is released before the destination is opened, so
    /// `out_path` may be the origin file itself. If building the output
    /// fails, the archive is left open and unchanged.
    pub fn write_and_dispose(&mut self, out_path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.state()?.output_bytes()?;
        self.dispose();
        fs::write(out_path.as_ref(), &bytes)?;
        log::debug!(
            "wrote {} bytes to {} and disposed",
            bytes.len(),
            out_path.as_ref().display()
        );
        Ok(())
    }
}

impl<R> ArchiveInner<R> {
    /// Returns `true` if `path` resolves to the origin file.
    fn is_origin_path(&self, path: &Path) -> bool {
        let Some(origin) = self.origin.as_ref().and_then(|o| o.path.as_ref()) else {
            return false;
        };
        // A destination that does not exist yet cannot be the origin.
        path.canonicalize().is_ok_and(|p| p == *origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_to_clean_is_verbatim() {
        let origin = vec![7u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0];
        let archive = Archive::open(Cursor::new(origin.clone())).unwrap();

        let mut out = Vec::new();
        assert_eq!(archive.write_to(&mut out).unwrap(), 16);
        assert_eq!(out, origin);
    }

    #[test]
    fn test_write_to_dirty_zeroes_reserved() {
        let origin = vec![7u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0];
        let mut archive = Archive::open(Cursor::new(origin)).unwrap();
        archive.force_rebuild_on_write().unwrap();

        let mut out = Vec::new();
        archive.write_to(&mut out).unwrap();
        assert_eq!(out, [0u8; 16]);
    }

    #[test]
    fn test_write_and_dispose_to_writer_target() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pak");

        let mut archive = Archive::open(Cursor::new(vec![0u8; 16])).unwrap();
        archive.set("a", b"x".to_vec()).unwrap();
        archive.write_and_dispose(&out).unwrap();

        assert!(archive.is_disposed());
        assert_eq!(fs::read(&out).unwrap().len(), 16 + 13 + 1);
        assert!(archive.write_to(Vec::new()).unwrap_err().is_disposed());
    }
}
