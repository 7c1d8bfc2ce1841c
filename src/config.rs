//! Configuration for SlotDB
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, SlotDbError};

/// Default name of the record data file
pub const DEFAULT_DATA_FILE: &str = "database.dat";

/// Default name of the persisted index file
pub const DEFAULT_INDEX_FILE: &str = "index.idx";

/// Main configuration for a SlotDB store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding both store files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── database.dat     (fixed-width record slots)
    ///     └── index.idx        (sorted key → offset entries)
    pub data_dir: PathBuf,

    /// File name of the data file inside `data_dir`
    pub data_file_name: String,

    /// File name of the index file inside `data_dir`
    pub index_file_name: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Whether writes are followed by an fsync
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Payload Configuration
    // -------------------------------------------------------------------------
    /// What to do with text longer than the slot payload
    pub payload_mode: PayloadMode,
}

/// Sync strategy for data and index writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// Leave flushing to the OS page cache
    #[default]
    OsBuffered,

    /// fsync after every write (safest, slowest)
    EveryWrite,
}

/// Handling of text that does not fit in a slot payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadMode {
    /// Silently cut the text at the payload capacity
    #[default]
    Truncate,

    /// Reject over-capacity text with `PayloadTooLarge`
    Strict,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            data_file_name: DEFAULT_DATA_FILE.to_string(),
            index_file_name: DEFAULT_INDEX_FILE.to_string(),
            sync_strategy: SyncStrategy::default(),
            payload_mode: PayloadMode::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config rooted at the current working directory, failing if it cannot be resolved
    pub fn from_current_dir() -> Result<Self> {
        let data_dir = env::current_dir().map_err(|e| {
            SlotDbError::Config(format!("cannot resolve current directory: {}", e))
        })?;
        Ok(Self {
            data_dir,
            ..Self::default()
        })
    }

    /// Full path of the data file
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file_name)
    }

    /// Full path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file_name)
    }

    /// Check that file names are usable and distinct
    pub fn validate(&self) -> Result<()> {
        if self.data_file_name.is_empty() || self.index_file_name.is_empty() {
            return Err(SlotDbError::Config("file names must not be empty".to_string()));
        }
        if self.data_file_name == self.index_file_name {
            return Err(SlotDbError::Config(format!(
                "data and index files must differ (both are {:?})",
                self.data_file_name
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory holding both store files
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the data file name
    pub fn data_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.data_file_name = name.into();
        self
    }

    /// Set the index file name
    pub fn index_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_file_name = name.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the payload mode
    pub fn payload_mode(mut self, mode: PayloadMode) -> Self {
        self.config.payload_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
