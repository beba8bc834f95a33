//! # pakfile
//!
//! A pure-Rust library for reading, editing and writing `.pak` archives.
//!
//! A pak archive is a flat container of files: a 16-byte header, a table of
//! contents (TOC) of `(offset, length, path)` records, then the raw content
//! of every file. There is no compression, no directory structure and no
//! checksum. Paths are arbitrary byte strings.
//!
//! Archives are opened lazily. Opening reads only the header; looking up a
//! file decodes TOC records only up to the one requested. Edits are kept in
//! memory as an overlay on top of the origin file until the archive is
//! written.
//!
//! ## Quick Start
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use pakfile::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::open_path("data.pak")?;
//!
//!     // Look up one file
//!     if let Some(view) = archive.open_file("readme.txt")? {
//!         let text = view.read()?;
//!         println!("{}", String::from_utf8_lossy(&text));
//!     }
//!
//!     // List everything
//!     for view in archive.iterate_files()? {
//!         println!("{}: {} bytes", view.path(), view.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Editing an Archive
//!
//! ```rust,no_run
//! use pakfile::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let mut archive = Archive::open_path("data.pak")?;
//!
//!     archive.remove("old.txt")?;
//!     archive.add("new.txt", b"Hello, World!".to_vec())?;
//!
//!     // Release the origin file and overwrite it
//!     archive.write_and_dispose("data.pak")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Creating an Archive
//!
//! ```rust
//! use pakfile::{Archive, Result};
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut archive = Archive::new();
//!     archive.set("a.txt", b"alpha".to_vec())?;
//!     archive.set("b.txt", b"beta".to_vec())?;
//!
//!     let mut bytes = Vec::new();
//!     archive.write_to(&mut bytes)?;
//!
//!     let reopened = Archive::open(Cursor::new(bytes))?;
//!     assert_eq!(reopened.count_files()?, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`:
//!
//! ```rust,no_run
//! use pakfile::{Archive, Error};
//!
//! fn open_archive(path: &str) -> pakfile::Result<()> {
//!     match Archive::open_path(path) {
//!         Ok(archive) => {
//!             println!("Opened archive with {} files", archive.count_files()?);
//!             Ok(())
//!         }
//!         Err(Error::NotFound { path }) => {
//!             eprintln!("No archive at {}", path);
//!             Ok(())
//!         }
//!         Err(e @ Error::CorruptArchive { .. }) => {
//!             eprintln!("Damaged archive: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! # fn main() {}
//! ```
//!
//! ## Resource Limits
//!
//! Declared lengths are checked before anything is allocated. The defaults
//! reject paths and files above 128 MiB and archives with more than a
//! million entries; [`ResourceLimits`] adjusts them per archive.
//!
//! ```rust,no_run
//! use pakfile::{Archive, ResourceLimits};
//!
//! let limits = ResourceLimits::new().max_entry_length(16 * 1024 * 1024);
//! let archive = Archive::open_path_with_limits("mods.pak", limits)?;
//! # Ok::<(), pakfile::Error>(())
//! ```
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod archive_path;
mod edit;
pub mod error;
pub mod format;
pub mod read;
mod write;

pub use archive_path::ArchivePath;
pub use error::{Error, Result};

// Re-export reading API at crate root for convenience
pub use read::{Archive, EntryView, EntryViews};

// Re-export format types
pub use format::header::ArchiveHeader;
pub use format::limits::ResourceLimits;
pub use format::toc::TocRecord;
