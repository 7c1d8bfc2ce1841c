//! Store Module
//!
//! The facade that coordinates the index and the data file.
//!
//! ## Responsibilities
//! - Reject duplicate keys and route lookups through binary search
//! - Write the data file before touching the index
//! - Persist the index after every structural change
//! - Load (and re-sort) the persisted index on startup
//!
//! ## Write Ordering
//! ```text
//! add:    data.append ──▶ index.insert ──▶ index_file.save
//! edit:   data.write_at                     (index unchanged, no save)
//! remove:                 index.remove_at ─▶ index_file.save
//! clear:  index_file.reset ─▶ index.clear ─▶ data.reset
//! generate: clear ─▶ data.append_all ─▶ index_file.save ─▶ index (swap)
//! ```
//!
//! If persisting the index fails, the in-memory change is undone before the
//! error is returned, so memory and disk keep agreeing.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::command::{Command, Response};
use crate::config::Config;
use crate::error::{Result, SlotDbError};
use crate::record::{Record, SLOT_SIZE};
use crate::storage::{DataFile, Index, IndexEntry, IndexFile};

/// Description of the search algorithm's cost, shown by shells on request
pub const SEARCH_COMPLEXITY: &str = "Time Complexity of Search:\n\
    \x20 Best Case: O(1)\n\
    \x20 Average Case: O(log N)\n\
    \x20 Worst Case: O(log N)\n\
    \x20 Where N is the number of records.\n\
    \x20 (Binary Search on sorted index)";

/// Outcome of a key lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Stored text, or `None` if the key is not indexed
    pub text: Option<String>,
    /// Binary search iterations spent on the lookup
    pub comparisons: u32,
}

/// Comparison statistics over a batch of random lookups
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchSample {
    pub samples: usize,
    pub total_comparisons: u64,
    pub max_comparisons: u32,
    pub average: f64,
}

/// What a compaction pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionStats {
    /// Slots still referenced by the index
    pub live_slots: usize,
    /// Bytes removed from the data file
    pub reclaimed_bytes: u64,
}

/// Key-indexed record store over a data file and an index file
///
/// ## Ownership
/// The store owns the in-memory index and is the only thing that touches
/// either file. Methods take `&mut self`; wrap the store in
/// [`SharedStore`](crate::SharedStore) to share it between threads.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Fixed-width record slots
    data: DataFile,

    /// Persisted copy of `index`
    index_file: IndexFile,

    /// Sorted key → offset entries, the authority on live keys
    index: Index,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Load the index file (missing file = empty store)
    /// 3. Re-sort whatever was loaded
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let data = DataFile::new(&config.data_path(), config.sync_strategy);
        let index_file = IndexFile::new(&config.index_path(), config.sync_strategy);
        let index = index_file.load()?;

        info!(
            data_dir = %config.data_dir.display(),
            keys = index.len(),
            "opened store"
        );

        Ok(Self {
            config,
            data,
            index_file,
            index,
        })
    }

    /// Open with default file names inside `path`
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation. `rng` is only drawn from by
    /// `Generate` and `Sample`.
    pub fn execute<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> Result<Response> {
        if command.is_mutation() {
            debug!(?command, "executing mutation");
        }

        Ok(match command {
            Command::Add { key, text } => Response::Added {
                key,
                inserted: self.add(key, &text)?,
            },
            Command::Search { key } => Response::Found {
                key,
                outcome: self.search(key)?,
            },
            Command::Edit { key, text } => Response::Edited {
                key,
                updated: self.edit(key, &text)?,
            },
            Command::Remove { key } => Response::Removed {
                key,
                removed: self.remove(key)?,
            },
            Command::Generate { count } => {
                self.generate_random(count, rng)?;
                Response::Generated { count }
            }
            Command::Clear => {
                self.clear()?;
                Response::Cleared
            }
            Command::ListIndex => Response::Index(self.list_index()),
            Command::ListRecords => Response::Records(self.list_records()?),
            Command::Complexity => Response::Complexity(self.complexity()),
            Command::Sample { samples } => Response::Sample(self.sample_search(samples, rng)?),
            Command::Compact => Response::Compacted(self.compact()?),
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a new record
    ///
    /// Returns `Ok(false)` without side effects if `key` already exists.
    /// Steps:
    /// 1. Append the encoded record to the data file
    /// 2. Insert the (key, offset) entry into the index
    /// 3. Persist the index
    pub fn add(&mut self, key: i32, text: &str) -> Result<bool> {
        if self.index.find(key).position.is_some() {
            debug!(key, "rejected duplicate key");
            return Ok(false);
        }

        let record = Record::encode_with(key, text, self.config.payload_mode)?;
        let offset = self.data.append(&record)?;
        self.index.insert(IndexEntry::new(key, offset));

        if let Err(e) = self.index_file.save(&self.index) {
            // The appended slot stays behind as an orphan
            if let Some(position) = self.index.find(key).position {
                self.index.remove_at(position);
            }
            return Err(e);
        }

        debug!(key, offset, "added record");
        Ok(true)
    }

    /// Replace the text of an existing record in place
    ///
    /// Returns `Ok(false)` if `key` is not indexed. The index is not changed.
    pub fn edit(&mut self, key: i32, text: &str) -> Result<bool> {
        let Some(entry) = self.entry_for(key) else {
            return Ok(false);
        };

        let record = Record::encode_with(key, text, self.config.payload_mode)?;
        self.data.write_at(entry.offset, &record)?;

        debug!(key, offset = entry.offset, "edited record");
        Ok(true)
    }

    /// Drop `key` from the index
    ///
    /// Returns `Ok(false)` if `key` is not indexed. The record's slot is left
    /// in the data file as an orphan; see [`Store::compact`].
    pub fn remove(&mut self, key: i32) -> Result<bool> {
        let Some(position) = self.index.find(key).position else {
            return Ok(false);
        };
        let Some(entry) = self.index.remove_at(position) else {
            return Ok(false);
        };

        if let Err(e) = self.index_file.save(&self.index) {
            self.index.insert(entry);
            return Err(e);
        }

        debug!(key, offset = entry.offset, "removed key");
        Ok(true)
    }

    /// Replace all contents with `count` records under unique random keys
    ///
    /// Keys are drawn from `0..i32::MAX`; each record's text is `Data_<key>`.
    /// The index is persisted once, after every record is appended.
    pub fn generate_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        if count > i32::MAX as usize {
            return Err(SlotDbError::InvalidArgument(format!(
                "cannot generate {} unique non-negative keys",
                count
            )));
        }

        self.clear()?;

        let mut used = HashSet::with_capacity(count);
        let mut records = Vec::with_capacity(count);
        while records.len() < count {
            let key = rng.gen_range(0..i32::MAX);
            if used.insert(key) {
                records.push(Record::encode(key, &format!("Data_{}", key)));
            }
        }

        let offsets = self.data.append_all(&records)?;
        let entries = records
            .iter()
            .zip(offsets)
            .map(|(record, offset)| IndexEntry::new(record.key(), offset))
            .collect();
        let index = Index::from_entries(entries);
        self.index_file.save(&index)?;
        self.index = index;

        info!(count, "generated random records");
        Ok(())
    }

    /// Empty the index (memory and disk) and truncate the data file
    ///
    /// The index file is emptied first, so a failure never leaves it pointing
    /// into a truncated data file.
    pub fn clear(&mut self) -> Result<()> {
        self.index_file.reset()?;
        self.index.clear();
        self.data.reset()?;

        info!("cleared store");
        Ok(())
    }

    /// Rewrite the data file with only the slots the index references
    ///
    /// Live records are written in key order and the index is re-pointed at
    /// their new offsets. Fails with `CorruptIndex` before touching any file if
    /// an indexed slot cannot be read.
    pub fn compact(&mut self) -> Result<CompactionStats> {
        let before = self.data.len()?;

        let mut records = Vec::with_capacity(self.index.len());
        for entry in self.index.entries() {
            records.push(self.read_indexed(entry)?);
        }

        let offsets = self.data.rewrite(&records)?;
        let entries = self
            .index
            .entries()
            .iter()
            .zip(offsets)
            .map(|(entry, offset)| IndexEntry::new(entry.key, offset))
            .collect();
        self.index = Index::from_entries(entries);
        self.index_file.save(&self.index)?;

        let stats = CompactionStats {
            live_slots: records.len(),
            reclaimed_bytes: before.saturating_sub((records.len() * SLOT_SIZE) as u64),
        };
        info!(
            live_slots = stats.live_slots,
            reclaimed_bytes = stats.reclaimed_bytes,
            "compacted data file"
        );
        Ok(stats)
    }

    /// Persist the index one last time and release the store
    pub fn close(self) -> Result<()> {
        self.index_file.save(&self.index)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up `key`: one binary search, then one direct read on a hit
    ///
    /// An indexed key whose slot cannot be read yields `CorruptIndex` rather
    /// than a "not found" outcome.
    pub fn search(&self, key: i32) -> Result<SearchOutcome> {
        let lookup = self.index.find(key);

        let text = match lookup.position.and_then(|p| self.index.get(p)) {
            Some(entry) => Some(self.read_indexed(entry)?.text()),
            None => None,
        };

        debug!(key, hit = text.is_some(), comparisons = lookup.comparisons, "search");
        Ok(SearchOutcome {
            text,
            comparisons: lookup.comparisons,
        })
    }

    /// Search `samples` randomly chosen indexed keys and report comparisons
    pub fn sample_search<R: Rng + ?Sized>(&self, samples: usize, rng: &mut R) -> Result<SearchSample> {
        let entries = self.index.entries();
        if entries.is_empty() || samples == 0 {
            return Ok(SearchSample::default());
        }

        let mut total = 0u64;
        let mut max = 0u32;
        for _ in 0..samples {
            let key = entries[rng.gen_range(0..entries.len())].key;
            let outcome = self.search(key)?;
            total += u64::from(outcome.comparisons);
            max = max.max(outcome.comparisons);
        }

        Ok(SearchSample {
            samples,
            total_comparisons: total,
            max_comparisons: max,
            average: total as f64 / samples as f64,
        })
    }

    /// Snapshot of the index in key order
    pub fn list_index(&self) -> Vec<IndexEntry> {
        self.index.entries().to_vec()
    }

    /// Every complete slot in the data file, live or orphaned, in file order
    pub fn list_records(&self) -> Result<Vec<Record>> {
        self.data.read_all()
    }

    /// Static description of search cost
    pub fn complexity(&self) -> &'static str {
        SEARCH_COMPLEXITY
    }

    /// True if `key` is indexed
    pub fn contains(&self, key: i32) -> bool {
        self.index.find(key).position.is_some()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the data file
    pub fn data_path(&self) -> &Path {
        self.data.path()
    }

    /// Path of the index file
    pub fn index_path(&self) -> &Path {
        self.index_file.path()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn entry_for(&self, key: i32) -> Option<IndexEntry> {
        self.index
            .find(key)
            .position
            .and_then(|p| self.index.get(p))
            .copied()
    }

    /// Read the slot an index entry points at
    ///
    /// A missing data file or an out-of-range offset means the index and the
    /// data file disagree.
    fn read_indexed(&self, entry: &IndexEntry) -> Result<Record> {
        match self.data.read_at(entry.offset) {
            Ok(record) => Ok(record),
            Err(SlotDbError::InvalidOffset { .. } | SlotDbError::ShortRead { .. }) => {
                warn!(key = entry.key, offset = entry.offset, "index points past data file");
                Err(corrupt(entry))
            }
            Err(SlotDbError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!(key = entry.key, "data file missing for indexed key");
                Err(corrupt(entry))
            }
            Err(e) => Err(e),
        }
    }
}

fn corrupt(entry: &IndexEntry) -> SlotDbError {
    SlotDbError::CorruptIndex {
        key: entry.key,
        offset: entry.offset as i64,
    }
}
