//! Archive opening methods.
//!
//! This module provides methods for opening pak archives from files or from
//! any seekable reader, and for creating empty in-memory archives.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use crate::format::ARCHIVE_EXTENSION;
use crate::format::limits::ResourceLimits;
use crate::{Error, Result};

use super::scanner::TocScanner;
use super::{Archive, Origin};

impl Archive<BufReader<File>> {
    /// Opens an archive from a file path.
    ///
    /// Only the header is read; TOC records are decoded on demand.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the path does not end in `.pak`
    ///   (compared case-insensitively)
    /// - [`Error::NotFound`] if the file does not exist
    /// - [`Error::CorruptArchive`] if the header is malformed
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_path_with_limits(path, ResourceLimits::default())
    }

    /// Opens an archive from a file path, treating a missing file as `None`.
    ///
    /// Every other failure is still an error.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pakfile::Archive;
    ///
    /// let archive = match Archive::open_path_lenient("saves/slot1.pak")? {
    ///     Some(archive) => archive,
    ///     None => Archive::new(),
    /// };
    /// # Ok::<(), pakfile::Error>(())
    /// ```
    pub fn open_path_lenient(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match Self::open_path(path) {
            Ok(archive) => Ok(Some(archive)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Opens an archive from a file path with custom resource limits.
    pub fn open_path_with_limits(path: impl AsRef<Path>, limits: ResourceLimits) -> Result<Self> {
        let path = path.as_ref();
        check_extension(path)?;

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        let canonical = path.canonicalize()?;

        log::debug!("opening archive {}", canonical.display());
        let scanner = TocScanner::new(BufReader::new(file), limits)?;
        Ok(Self::from_parts(
            Some(Origin {
                path: Some(canonical),
                scanner,
            }),
            limits,
        ))
    }

    /// Creates an empty archive that lives only in memory.
    ///
    /// The archive starts dirty: writing it always rebuilds.
    pub fn new() -> Self {
        Self::from_parts(None, ResourceLimits::default())
    }

    /// Creates an empty in-memory archive with custom resource limits.
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self::from_parts(None, limits)
    }
}

impl Default for Archive<BufReader<File>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Opens an archive from a seekable reader.
    ///
    /// The reader is owned by the archive until it is disposed. Archives
    /// opened this way have no origin path, so [`Archive::write`] never
    /// refuses a destination.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pakfile::Archive;
    /// use std::io::Cursor;
    ///
    /// // An empty archive: a header with zero entries.
    /// let archive = Archive::open(Cursor::new(vec![0u8; 16]))?;
    /// assert_eq!(archive.count_files()?, 0);
    /// # Ok::<(), pakfile::Error>(())
    /// ```
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_limits(reader, ResourceLimits::default())
    }

    /// Opens an archive from a seekable reader with custom resource limits.
    pub fn open_with_limits(reader: R, limits: ResourceLimits) -> Result<Self> {
        let scanner = TocScanner::new(reader, limits)?;
        Ok(Self::from_parts(
            Some(Origin {
                path: None,
                scanner,
            }),
            limits,
        ))
    }
}

/// Rejects paths without the `.pak` extension.
fn check_extension(path: &Path) -> Result<()> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
    if !matches {
        return Err(Error::InvalidArgument(format!(
            "'{}' is not a .{} file",
            path.display(),
            ARCHIVE_EXTENSION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Path::new("a.pak")).is_ok());
        assert!(check_extension(Path::new("dir/A.PAK")).is_ok());
        assert!(check_extension(Path::new("a.Pak")).is_ok());

        for bad in ["a.zip", "a", "a.pak.bak", "pak", ".pak"] {
            let err = check_extension(Path::new(bad)).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument(_)),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_wrong_extension_checked_before_io() {
        // The file does not exist, but the extension is reported first.
        let err = Archive::open_path("/nonexistent/archive.zip").err().unwrap();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Archive::open_path("/nonexistent/archive.pak").err().unwrap();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(
            Archive::open_path_lenient("/nonexistent/archive.pak")
                .unwrap()
                .is_none()
        );
    }
}
