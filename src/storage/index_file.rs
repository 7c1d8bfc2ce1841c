//! Index File
//!
//! Persists the in-memory index as a flat array of 12-byte entries.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SyncStrategy;
use crate::error::Result;

use super::Index;

/// Handle for the persisted index
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
    sync_strategy: SyncStrategy,
}

impl IndexFile {
    pub fn new(path: &Path, sync_strategy: SyncStrategy) -> Self {
        Self {
            path: path.to_path_buf(),
            sync_strategy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index, treating a missing file as empty
    pub fn load(&self) -> Result<Index> {
        match fs::read(&self.path) {
            Ok(bytes) => Index::load_from(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Index::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the whole index, replacing the previous file
    ///
    /// Bytes go to a sibling `.tmp` file which is then renamed into place, so
    /// a failed save leaves the previous index file intact.
    pub fn save(&self, index: &Index) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");

        let result = self.write_staged(&tmp_path, &index.serialize_to());
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result?;

        fs::rename(&tmp_path, &self.path)?;
        debug!(entries = index.len(), "persisted index");
        Ok(())
    }

    /// Truncate the index file to zero length
    pub fn reset(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.maybe_sync(&file)
    }

    fn write_staged(&self, tmp_path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = File::create(tmp_path)?;
        file.write_all(bytes)?;
        self.maybe_sync(&file)
    }

    fn maybe_sync(&self, file: &File) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}
