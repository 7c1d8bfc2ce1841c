//! Response definitions
//!
//! Values returned to the shell after executing a command.

use std::fmt;

use crate::record::Record;
use crate::storage::IndexEntry;
use crate::store::{CompactionStats, SearchOutcome, SearchSample};

/// Result of one executed command
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `inserted` is false when the key already existed
    Added { key: i32, inserted: bool },

    Found { key: i32, outcome: SearchOutcome },

    /// `updated` is false when the key was not indexed
    Edited { key: i32, updated: bool },

    /// `removed` is false when the key was not indexed
    Removed { key: i32, removed: bool },

    Generated { count: usize },

    Cleared,

    Index(Vec<IndexEntry>),

    Records(Vec<Record>),

    Complexity(&'static str),

    Sample(SearchSample),

    Compacted(CompactionStats),
}

impl Response {
    /// False when the command was rejected (duplicate or missing key)
    pub fn is_success(&self) -> bool {
        match self {
            Response::Added { inserted, .. } => *inserted,
            Response::Found { outcome, .. } => outcome.text.is_some(),
            Response::Edited { updated, .. } => *updated,
            Response::Removed { removed, .. } => *removed,
            _ => true,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Added { key, inserted: true } => write!(f, "Added record: key={}", key),
            Response::Added { key, inserted: false } => {
                write!(f, "Key {} already exists", key)
            }
            Response::Found { key, outcome } => match &outcome.text {
                Some(text) => write!(
                    f,
                    "Found: key={}, data={} (comparisons: {})",
                    key, text, outcome.comparisons
                ),
                None => write!(
                    f,
                    "Not found: key={} (comparisons: {})",
                    key, outcome.comparisons
                ),
            },
            Response::Edited { key, updated: true } => write!(f, "Edited record: key={}", key),
            Response::Edited { key, updated: false } | Response::Removed { key, removed: false } => {
                write!(f, "Key {} not found", key)
            }
            Response::Removed { key, removed: true } => write!(f, "Deleted record: key={}", key),
            Response::Generated { count } => write!(f, "Generated {} random records", count),
            Response::Cleared => write!(f, "Database cleared"),
            Response::Index(entries) => {
                writeln!(f, "{:>12}  {:>12}", "KEY", "OFFSET")?;
                for entry in entries {
                    writeln!(f, "{:>12}  {:>12}", entry.key, entry.offset)?;
                }
                write!(f, "{} index entries", entries.len())
            }
            Response::Records(records) => {
                writeln!(f, "{:>12}  DATA", "KEY")?;
                for record in records {
                    writeln!(f, "{:>12}  {}", record.key(), record.text())?;
                }
                write!(f, "{} records", records.len())
            }
            Response::Complexity(text) => write!(f, "Complexity:\n{}", text),
            Response::Sample(sample) => write!(
                f,
                "Average comparisons for {} searches: {:.2} (max {})",
                sample.samples, sample.average, sample.max_comparisons
            ),
            Response::Compacted(stats) => write!(
                f,
                "Compacted data file: {} live slots kept, {} bytes reclaimed",
                stats.live_slots, stats.reclaimed_bytes
            ),
        }
    }
}
