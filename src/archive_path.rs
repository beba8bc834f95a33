//! Archive path type: the key of every entry in a pak archive.

use crate::format::MAX_FIELD_LENGTH;
use crate::{Error, Result};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// A path inside a pak archive.
///
/// Pak paths are raw byte strings with no encoding and no separator rules:
/// two paths are the same entry exactly when their bytes are equal. The only
/// validation is the format's length ceiling, so that every path accepted here
/// can be written and read back.
///
/// # Examples
///
/// ```
/// use pakfile::ArchivePath;
///
/// let path = ArchivePath::new("dir/file.txt").unwrap();
/// assert_eq!(path.as_bytes(), b"dir/file.txt");
/// assert_eq!(path.to_string_lossy(), "dir/file.txt");
///
/// // Non-UTF-8 bytes are allowed
/// let raw = ArchivePath::new(vec![0xFF, 0x00, b'a']).unwrap();
/// assert_eq!(raw.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(Vec<u8>);

impl ArchivePath {
    /// Creates a new `ArchivePath` from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the path is longer than the
    /// format's 128 MiB ceiling.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX_FIELD_LENGTH as usize {
            return Err(Error::InvalidArgument(format!(
                "path length {} exceeds maximum of {} bytes",
                bytes.len(),
                MAX_FIELD_LENGTH
            )));
        }
        Ok(Self(bytes))
    }

    /// Wraps bytes already checked against an archive's own limits: decoded
    /// from a TOC record, matched against a table key, or validated by
    /// `checked_path`.
    pub(crate) fn from_decoded(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the path bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the path length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the zero-length path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path as UTF-8, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Returns the path as a string, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Consumes the path, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl AsRef<[u8]> for ArchivePath {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// The derived Hash/Eq of the newtype delegate to the inner bytes, so lookups
// by `&[u8]` agree with lookups by `ArchivePath`.
impl Borrow<[u8]> for ArchivePath {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&[u8]> for ArchivePath {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_valid_paths() {
        assert!(ArchivePath::new("file.txt").is_ok());
        assert!(ArchivePath::new("dir/sub/file.txt").is_ok());
        assert!(ArchivePath::new("../not/special").is_ok());
        assert!(ArchivePath::new("").is_ok());
    }

    #[test]
    fn test_raw_bytes() {
        let path = ArchivePath::new(vec![0xC3, 0x28]).unwrap();
        assert_eq!(path.to_str(), None);
        assert_eq!(path.to_string_lossy(), "\u{FFFD}(");
        assert_eq!(path.into_bytes(), vec![0xC3, 0x28]);
    }

    #[test]
    fn test_display() {
        let path = ArchivePath::new("a/b.txt").unwrap();
        assert_eq!(format!("{}", path), "a/b.txt");
    }

    #[test]
    fn test_try_from() {
        let a = ArchivePath::try_from("x").unwrap();
        let b = ArchivePath::try_from(&b"x"[..]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(ArchivePath::new("1.txt").unwrap(), 1);
        assert_eq!(map.get(&b"1.txt"[..]), Some(&1));
        assert_eq!(map.get(&b"2.txt"[..]), None);
    }

    #[test]
    fn test_too_long_rejected() {
        let long = vec![b'a'; MAX_FIELD_LENGTH as usize + 1];
        let err = ArchivePath::new(long).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
