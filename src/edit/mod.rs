//! Archive editing.
//!
//! Edits never touch the origin stream. They are recorded in the entry
//! table, an overlay on top of the on-disk TOC:
//! - Adding or replacing a file installs its content in memory
//! - Removing a file installs a tombstone that hides the on-disk record
//!
//! Any edit marks the archive dirty, so the next write rebuilds it from the
//! overlay instead of copying the origin.
//!
//! # Example
//!
//! ```rust,no_run
//! use pakfile::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let mut archive = Archive::open_path("game.pak")?;
//!
//!     archive.remove("levels/old.map")?;
//!     archive.set("config.ini", b"fullscreen=1\n".to_vec())?;
//!     archive.import_path("textures/sky.png", "assets/sky.png")?;
//!
//!     // The origin is still open, so write elsewhere or dispose first.
//!     archive.write("game-patched.pak")?;
//!     Ok(())
//! }
//! ```

mod mutation;
pub(crate) mod table;
