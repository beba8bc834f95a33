//! The entry table: an overlay of in-memory changes over on-disk records.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::rc::Rc;

use crate::ArchivePath;

/// Where the content of a live entry is.
#[derive(Debug, Clone)]
pub(crate) enum EntryData {
    /// Content lives in the origin stream and has not been read.
    OnDisk {
        /// Absolute offset in the origin stream.
        offset: u32,
        /// Content length in bytes.
        length: u32,
    },
    /// Content is resident: a new or modified file.
    InMemory(Rc<[u8]>),
}

impl EntryData {
    /// Content length in bytes.
    pub(crate) fn len(&self) -> u32 {
        match self {
            EntryData::OnDisk { length, .. } => *length,
            // Resident content is bounded by the archive's limits on insert.
            EntryData::InMemory(bytes) => bytes.len() as u32,
        }
    }
}

/// The state of one path in the table.
#[derive(Debug, Clone)]
pub(crate) enum EntryState {
    /// The path holds a file.
    Live(EntryData),
    /// The path was removed. Scanning must never bring it back.
    Tombstone,
}

/// A live entry captured for rebuilding or iteration.
#[derive(Debug, Clone)]
pub(crate) struct LiveEntry {
    pub(crate) path: ArchivePath,
    pub(crate) data: EntryData,
}

/// Mapping from path to entry state, with a stable slot order.
///
/// A path keeps the slot of its first insertion for the life of the table:
/// overwriting or removing it changes the state in place. Traversals
/// therefore always see paths in the same order, and a snapshot taken once
/// can drive both passes of a rebuild.
#[derive(Debug, Default)]
pub(crate) struct EntryTable {
    slots: Vec<(ArchivePath, EntryState)>,
    index: HashMap<ArchivePath, usize>,
    live: usize,
}

impl EntryTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the state recorded for `path`, if any.
    pub(crate) fn get(&self, path: &[u8]) -> Option<&EntryState> {
        self.index.get(path).map(|&slot| &self.slots[slot].1)
    }

    /// Returns the live content for `path`, ignoring tombstones.
    pub(crate) fn get_live(&self, path: &[u8]) -> Option<&EntryData> {
        match self.get(path)? {
            EntryState::Live(data) => Some(data),
            EntryState::Tombstone => None,
        }
    }

    /// Records a scanned on-disk entry unless the path is already known.
    ///
    /// Returns `false` when an existing state (live or tombstone) wins.
    pub(crate) fn insert_scanned(&mut self, path: ArchivePath, offset: u32, length: u32) -> bool {
        match self.index.entry(path) {
            MapEntry::Occupied(_) => false,
            MapEntry::Vacant(vacant) => {
                let state = EntryState::Live(EntryData::OnDisk { offset, length });
                self.slots.push((vacant.key().clone(), state));
                vacant.insert(self.slots.len() - 1);
                self.live += 1;
                true
            }
        }
    }

    /// Installs `state` for `path`, replacing whatever was there.
    pub(crate) fn install(&mut self, path: ArchivePath, state: EntryState) {
        let now_live = matches!(state, EntryState::Live(_));
        let was_live = match self.index.entry(path) {
            MapEntry::Occupied(occupied) => {
                let slot = &mut self.slots[*occupied.get()].1;
                let was_live = matches!(slot, EntryState::Live(_));
                *slot = state;
                was_live
            }
            MapEntry::Vacant(vacant) => {
                self.slots.push((vacant.key().clone(), state));
                vacant.insert(self.slots.len() - 1);
                false
            }
        };
        match (was_live, now_live) {
            (false, true) => self.live += 1,
            (true, false) => self.live -= 1,
            _ => {}
        }
    }

    /// Number of live (non-tombstoned) entries.
    pub(crate) fn live_count(&self) -> usize {
        self.live
    }

    /// Materializes the live entries in slot order.
    pub(crate) fn snapshot(&self) -> Vec<LiveEntry> {
        self.slots
            .iter()
            .filter_map(|(path, state)| match state {
                EntryState::Live(data) => Some(LiveEntry {
                    path: path.clone(),
                    data: data.clone(),
                }),
                EntryState::Tombstone => None,
            })
            .collect()
    }

    /// Total number of recorded paths, tombstones included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> ArchivePath {
        ArchivePath::new(s).unwrap()
    }

    fn paths(entries: &[LiveEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_scanned_entry_does_not_overwrite() {
        let mut table = EntryTable::new();
        assert!(table.insert_scanned(path("a"), 100, 3));
        assert!(!table.insert_scanned(path("a"), 200, 5));

        match table.get_live(b"a") {
            Some(EntryData::OnDisk { offset, length }) => {
                assert_eq!((*offset, *length), (100, 3));
            }
            other => panic!("Expected OnDisk, got: {:?}", other),
        }
    }

    #[test]
    fn test_tombstone_blocks_scan() {
        let mut table = EntryTable::new();
        table.install(path("gone"), EntryState::Tombstone);
        assert!(!table.insert_scanned(path("gone"), 16, 1));
        assert!(matches!(table.get(b"gone"), Some(EntryState::Tombstone)));
        assert!(table.get_live(b"gone").is_none());
        assert_eq!(table.live_count(), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_install_overwrites_tombstone() {
        let mut table = EntryTable::new();
        table.install(path("x"), EntryState::Tombstone);
        table.install(
            path("x"),
            EntryState::Live(EntryData::InMemory(Rc::from(&b"new"[..]))),
        );
        assert_eq!(table.get_live(b"x").map(EntryData::len), Some(3));
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn test_slot_order_is_stable() {
        let mut table = EntryTable::new();
        table.insert_scanned(path("1"), 0, 1);
        table.insert_scanned(path("2"), 1, 1);
        table.insert_scanned(path("3"), 2, 1);

        // Overwriting keeps the slot; removing and re-adding keeps it too.
        table.install(
            path("1"),
            EntryState::Live(EntryData::InMemory(Rc::from(&b"one"[..]))),
        );
        table.install(path("2"), EntryState::Tombstone);
        table.install(path("4"), EntryState::Live(EntryData::InMemory(Rc::from(&b""[..]))));

        let first = table.snapshot();
        assert_eq!(paths(&first), ["1", "3", "4"]);
        assert_eq!(paths(&table.snapshot()), paths(&first));

        table.install(
            path("2"),
            EntryState::Live(EntryData::InMemory(Rc::from(&b"back"[..]))),
        );
        assert_eq!(paths(&table.snapshot()), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_live_count_follows_state_changes() {
        let mut table = EntryTable::new();
        let live = || EntryState::Live(EntryData::InMemory(Rc::from(&b"x"[..])));
        table.insert_scanned(path("a"), 0, 1);
        table.install(path("a"), live());
        table.install(path("b"), live());
        assert_eq!(table.live_count(), 2);

        table.install(path("a"), EntryState::Tombstone);
        table.install(path("a"), EntryState::Tombstone);
        table.install(path("c"), EntryState::Tombstone);
        assert_eq!(table.live_count(), 1);
        assert_eq!(table.live_count(), table.snapshot().len());
    }

    #[test]
    fn test_entry_data_len() {
        let data = EntryData::OnDisk {
            offset: 10,
            length: 42,
        };
        assert_eq!(data.len(), 42);
        assert_eq!(EntryData::InMemory(Rc::from(&b"abc"[..])).len(), 3);
    }
}
