//! Sorted key → offset index
//!
//! In-memory array of entries kept strictly ascending by key. It is the only
//! authority on which keys exist; the data file may hold orphaned slots.

use bytes::{Buf, BufMut};
use tracing::warn;

use crate::error::{Result, SlotDbError};

/// On-disk size of one index entry: key (4) + offset (8) = 12 bytes
pub const INDEX_ENTRY_SIZE: usize = 4 + 8;

/// Location of one record slot in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: i32,
    /// Byte offset of the slot in the data file
    pub offset: u64,
}

impl IndexEntry {
    pub fn new(key: i32, offset: u64) -> Self {
        Self { key, offset }
    }
}

/// Result of a binary search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// Position of the matching entry, if the key is present
    pub position: Option<usize>,
    /// Number of search loop iterations performed
    pub comparisons: u32,
}

/// Sorted, unique collection of index entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from entries in any order
    ///
    /// Entries are stably sorted by key; for repeated keys the first
    /// occurrence wins.
    pub fn from_entries(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_by_key(|e| e.key);
        entries.dedup_by_key(|e| e.key);
        Self { entries }
    }

    /// Binary search for `key` over the closed range `[left, right]`,
    /// counting loop iterations
    ///
    /// `mid` is the lower middle of an even-length range, so `[1, 2]` finds
    /// `1` in one comparison and `2` in two.
    pub fn find(&self, key: i32) -> Lookup {
        let mut comparisons = 0;
        let mut left = 0;
        let mut right = match self.entries.len().checked_sub(1) {
            Some(last) => last,
            None => {
                return Lookup {
                    position: None,
                    comparisons,
                }
            }
        };

        while left <= right {
            comparisons += 1;
            let mid = left + (right - left) / 2;
            let mid_key = self.entries[mid].key;

            if mid_key == key {
                return Lookup {
                    position: Some(mid),
                    comparisons,
                };
            }
            if mid_key < key {
                left = mid + 1;
            } else {
                match mid.checked_sub(1) {
                    Some(below) => right = below,
                    None => break,
                }
            }
        }

        Lookup {
            position: None,
            comparisons,
        }
    }

    /// Insert an entry at its sorted position
    ///
    /// Returns false (leaving the index unchanged) if the key already exists.
    pub fn insert(&mut self, entry: IndexEntry) -> bool {
        let at = self.entries.partition_point(|e| e.key < entry.key);
        if self.entries.get(at).is_some_and(|e| e.key == entry.key) {
            return false;
        }
        self.entries.insert(at, entry);
        true
    }

    /// Remove the entry at `position`, as returned by [`Index::find`]
    pub fn remove_at(&mut self, position: usize) -> Option<IndexEntry> {
        if position < self.entries.len() {
            Some(self.entries.remove(position))
        } else {
            None
        }
    }

    /// Entry at `position`
    pub fn get(&self, position: usize) -> Option<&IndexEntry> {
        self.entries.get(position)
    }

    /// All entries in key order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Encode all entries in current order: [key i32 LE][offset i64 LE] each
    pub fn serialize_to(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.entries.len() * INDEX_ENTRY_SIZE);
        for entry in &self.entries {
            buf.put_i32_le(entry.key);
            buf.put_i64_le(entry.offset as i64);
        }
        buf
    }

    /// Decode persisted entries, re-sorting them regardless of stored order
    ///
    /// A trailing partial entry is ignored. Duplicate keys keep their first
    /// occurrence. A negative offset is reported as `CorruptIndex`.
    pub fn load_from(bytes: &[u8]) -> Result<Self> {
        let trailing = bytes.len() % INDEX_ENTRY_SIZE;
        if trailing != 0 {
            warn!(trailing, "ignoring partial entry at end of index file");
        }

        let mut buf = &bytes[..bytes.len() - trailing];
        let mut entries = Vec::with_capacity(buf.len() / INDEX_ENTRY_SIZE);
        while buf.has_remaining() {
            let key = buf.get_i32_le();
            let raw_offset = buf.get_i64_le();
            let offset = u64::try_from(raw_offset).map_err(|_| SlotDbError::CorruptIndex {
                key,
                offset: raw_offset,
            })?;
            entries.push(IndexEntry { key, offset });
        }

        if !entries.windows(2).all(|w| w[0].key < w[1].key) {
            warn!(entries = entries.len(), "index file out of order, re-sorting");
        }

        let loaded = entries.len();
        let index = Self::from_entries(entries);
        if index.len() != loaded {
            warn!(
                dropped = loaded - index.len(),
                "dropped duplicate keys from index file"
            );
        }
        Ok(index)
    }
}
