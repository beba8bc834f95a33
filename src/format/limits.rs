//! Resource limits applied while decoding and mutating archives.

use super::MAX_FIELD_LENGTH;

/// Resource limits for archive parsing and mutation.
///
/// These protect against corrupted or malicious archives: every declared
/// length is checked against a limit before a buffer sized by it is
/// allocated. The same limits bound paths, content and the number of live
/// entries handed to [`Archive::set`](crate::Archive::set) and friends, and
/// a rebuild holding more than `max_entries` entries is refused, so that
/// every archive this crate writes can be opened again with the same limits.
///
/// # Example
///
/// ```rust
/// use pakfile::ResourceLimits;
///
/// let limits = ResourceLimits::default()
///     .max_entries(10_000)
///     .max_entry_length(16 << 20);
/// assert_eq!(limits.max_entries, 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum number of TOC records an archive may declare.
    pub max_entries: u32,
    /// Maximum content length of a single entry, in bytes.
    pub max_entry_length: u32,
    /// Maximum path length of a single entry, in bytes.
    pub max_path_length: u32,
}

impl Default for ResourceLimits {
    /// Creates resource limits with the following default values:
    ///
    /// | Limit | Default Value |
    /// |-------|---------------|
    /// | `max_entries` | 1,000,000 |
    /// | `max_entry_length` | 128 MiB |
    /// | `max_path_length` | 128 MiB |
    fn default() -> Self {
        Self {
            max_entries: 1_000_000,
            max_entry_length: MAX_FIELD_LENGTH,
            max_path_length: MAX_FIELD_LENGTH,
        }
    }
}

impl ResourceLimits {
    /// Creates new resource limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the loosest limits the format can represent.
    ///
    /// Lengths are still bounded by the signed 32-bit fields of the format.
    pub fn unlimited() -> Self {
        Self {
            max_entries: i32::MAX as u32,
            max_entry_length: i32::MAX as u32,
            max_path_length: i32::MAX as u32,
        }
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: u32) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum content length of a single entry.
    pub fn max_entry_length(mut self, max: u32) -> Self {
        self.max_entry_length = max;
        self
    }

    /// Sets the maximum path length of a single entry.
    pub fn max_path_length(mut self, max: u32) -> Self {
        self.max_path_length = max;
        self
    }
}
