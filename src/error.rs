//! Error types for pak archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with pak archives, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing is
//! retried internally: the format has no transient failure modes, only
//! corruption or misuse.
//!
//! ```rust,no_run
//! use pakfile::{Archive, Error};
//!
//! fn open_or_report(path: &str) -> pakfile::Result<()> {
//!     match Archive::open_path(path) {
//!         Ok(archive) => {
//!             println!("{} files", archive.count_files()?);
//!             Ok(())
//!         }
//!         Err(Error::NotFound { path }) => {
//!             eprintln!("no such archive: {}", path);
//!             Ok(())
//!         }
//!         Err(e @ Error::CorruptArchive { .. }) => {
//!             eprintln!("damaged archive: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// The main error type for pak archive operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`NotFound`][Self::NotFound] | File system operations |
/// | Format | [`CorruptArchive`][Self::CorruptArchive] | Damaged or malicious input |
/// | Misuse | [`InvalidArgument`][Self::InvalidArgument], [`AlreadyExists`][Self::AlreadyExists], [`InvalidState`][Self::InvalidState] | Caller errors |
/// | Resources | [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Output too large for the format or limits |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input has the wrong shape.
    ///
    /// Returned for a path without the `.pak` extension, or for content and
    /// paths larger than the admissible ceiling.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The archive file to open does not exist.
    ///
    /// [`Archive::open_path_lenient`](crate::Archive::open_path_lenient)
    /// turns this into `Ok(None)`.
    #[error("Archive not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// The archive data is corrupt or truncated.
    ///
    /// Raised when a declared length exceeds the admissible ceiling, a field is
    /// negative, a content span lies outside the file, or the stream ends in the
    /// middle of a structure. The archive is never silently truncated.
    #[error("Corrupt archive at offset {offset:#x}: {reason}")]
    CorruptArchive {
        /// The byte offset where corruption was detected.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// An entry already exists in the archive.
    ///
    /// Returned by [`Archive::add`](crate::Archive::add) for a live path. Use
    /// [`Archive::set`](crate::Archive::set) to replace content unconditionally.
    #[error("Entry already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: String,
    },

    /// The operation is not allowed in the archive's current state.
    ///
    /// Returned for any operation on a disposed archive (including reads
    /// through an [`EntryView`](crate::EntryView)), and for a plain `write`
    /// targeting the archive's own origin file.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The result would exceed what the format can address, or hold more
    /// entries than the archive's limits allow.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl Error {
    /// Returns `true` if this is a data corruption error.
    ///
    /// An unexpected end of file while reading archive structures is reported
    /// as [`Error::CorruptArchive`], so this covers truncation too.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptArchive { .. })
    }

    /// Returns `true` if this error was caused by using a disposed archive.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Error::InvalidState(msg) if msg == DISPOSED_MESSAGE)
    }

    /// Returns the entry or archive path associated with this error, if any.
    pub fn entry_path(&self) -> Option<&str> {
        match self {
            Error::NotFound { path } => Some(path.as_str()),
            Error::AlreadyExists { path } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Creates a CorruptArchive error.
    pub fn corrupt_archive(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptArchive {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates the error returned by every operation on a disposed archive.
    pub(crate) fn disposed() -> Self {
        Error::InvalidState(DISPOSED_MESSAGE.into())
    }

    /// Maps an I/O error raised while reading archive structures at `offset`.
    ///
    /// Running out of data in the middle of a structure means the archive is
    /// truncated, which is corruption rather than an I/O failure.
    pub(crate) fn from_read(e: io::Error, offset: u64, what: &str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::corrupt_archive(offset, format!("unexpected end of file reading {}", what))
        } else {
            Error::Io(e)
        }
    }
}

const DISPOSED_MESSAGE: &str = "archive has been disposed";

/// A specialized Result type for pak operations.
pub type Result<T> = std::result::Result<T, Error>;
