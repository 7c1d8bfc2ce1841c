//! Command Module
//!
//! Operations an outer shell (CLI, UI) can ask a store to perform, and the
//! values it gets back. `Store::execute` routes each command to the
//! matching facade operation.

mod response;

pub use response::Response;

/// Default number of records produced by [`Command::Generate`] from the CLI
pub const DEFAULT_GENERATE_COUNT: usize = 10_000;

/// Default number of lookups performed by [`Command::Sample`] from the CLI
pub const DEFAULT_SAMPLE_SIZE: usize = 25;

/// A request against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert a new record
    Add { key: i32, text: String },

    /// Look up a key
    Search { key: i32 },

    /// Replace the text of an existing record
    Edit { key: i32, text: String },

    /// Drop a key from the index
    Remove { key: i32 },

    /// Replace all contents with `count` random records
    Generate { count: usize },

    /// Empty both files
    Clear,

    /// Snapshot of the index in key order
    ListIndex,

    /// Full scan of the data file
    ListRecords,

    /// Search complexity description
    Complexity,

    /// Average comparisons over random lookups of indexed keys
    Sample { samples: usize },

    /// Rewrite the data file without orphaned slots
    Compact,
}

impl Command {
    /// True for commands that may change either file
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Edit { .. }
                | Command::Remove { .. }
                | Command::Generate { .. }
                | Command::Clear
                | Command::Compact
        )
    }
}
