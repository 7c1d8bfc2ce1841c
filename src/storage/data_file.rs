//! Data File
//!
//! Append/random-access store of fixed-width record slots.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::SyncStrategy;
use crate::error::{Result, SlotDbError};
use crate::record::{Record, SLOT_SIZE};

const SLOT: u64 = SLOT_SIZE as u64;

/// Byte store holding a sequence of record slots at stable offsets
///
/// Slots are never moved once written: `append` grows the file, `write_at`
/// overwrites in place and only `reset`/`rewrite` discard bytes.
#[derive(Debug, Clone)]
pub struct DataFile {
    /// Path of the data file
    path: PathBuf,
    /// Whether writes are fsynced
    sync_strategy: SyncStrategy,
}

impl DataFile {
    /// Handle for the data file at `path` (the file is created lazily)
    pub fn new(path: &Path, sync_strategy: SyncStrategy) -> Self {
        Self {
            path: path.to_path_buf(),
            sync_strategy,
        }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file length in bytes (0 if the file does not exist yet)
    pub fn len(&self) -> Result<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// True if the file holds no bytes
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of complete slots in the file, live or orphaned
    pub fn slot_count(&self) -> Result<u64> {
        Ok(self.len()? / SLOT)
    }

    /// Append one record at the end of the file, returning its offset
    pub fn append(&self, record: &Record) -> Result<u64> {
        let mut file = self.open_for_append()?;
        let offset = Self::aligned_end(&mut file, &self.path)?;

        file.write_all(&record.to_bytes())?;
        self.maybe_sync(&file)?;

        debug!(key = record.key(), offset, "appended slot");
        Ok(offset)
    }

    /// Append records in order through one buffered handle, returning their offsets
    pub fn append_all(&self, records: &[Record]) -> Result<Vec<u64>> {
        let mut file = self.open_for_append()?;
        let mut offset = Self::aligned_end(&mut file, &self.path)?;

        let mut offsets = Vec::with_capacity(records.len());
        let mut writer = BufWriter::new(file);
        for record in records {
            writer.write_all(&record.to_bytes())?;
            offsets.push(offset);
            offset += SLOT;
        }
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| SlotDbError::Io(e.into_error()))?;
        self.maybe_sync(&file)?;

        debug!(count = records.len(), "appended slots");
        Ok(offsets)
    }

    /// Overwrite the existing slot starting at `offset`
    pub fn write_at(&self, offset: u64, record: &Record) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        let len = file.metadata()?.len();
        Self::check_slot(offset, len)?;

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&record.to_bytes())?;
        self.maybe_sync(&file)?;

        debug!(key = record.key(), offset, "overwrote slot");
        Ok(())
    }

    /// Read the full slot starting at `offset`
    pub fn read_at(&self, offset: u64) -> Result<Record> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if offset % SLOT != 0 {
            return Err(SlotDbError::InvalidOffset { offset, len });
        }

        file.seek(SeekFrom::Start(offset))?;
        let mut slot = [0u8; SLOT_SIZE];
        file.read_exact(&mut slot).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => SlotDbError::ShortRead { offset },
            _ => SlotDbError::Io(e),
        })?;

        Ok(Record::from_bytes(&slot))
    }

    /// Decode every complete slot from start to end
    ///
    /// A trailing partial slot is skipped. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let chunks = bytes.chunks_exact(SLOT_SIZE);
        if !chunks.remainder().is_empty() {
            warn!(
                path = %self.path.display(),
                trailing = chunks.remainder().len(),
                "ignoring partial slot at end of data file"
            );
        }

        Ok(chunks
            .filter_map(|chunk| <&[u8; SLOT_SIZE]>::try_from(chunk).ok())
            .map(Record::from_bytes)
            .collect())
    }

    /// Truncate the file to zero length, creating it if needed
    pub fn reset(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.maybe_sync(&file)?;

        debug!(path = %self.path.display(), "reset data file");
        Ok(())
    }

    /// Replace the whole file with `records`, returning their new offsets
    ///
    /// The new contents are staged in a sibling file and renamed over the
    /// original, so a failed write leaves the old file untouched.
    pub fn rewrite(&self, records: &[Record]) -> Result<Vec<u64>> {
        let staged = DataFile::new(&self.path.with_extension("compact"), self.sync_strategy);
        staged.reset()?;

        let offsets = match staged.append_all(records) {
            Ok(offsets) => offsets,
            Err(e) => {
                let _ = fs::remove_file(staged.path());
                return Err(e);
            }
        };

        fs::rename(staged.path(), &self.path)?;
        Ok(offsets)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_for_append(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)?)
    }

    /// Seek to the end of the last complete slot, dropping any partial tail
    fn aligned_end(file: &mut File, path: &Path) -> Result<u64> {
        let len = file.metadata()?.len();
        let aligned = len - len % SLOT;
        if aligned != len {
            warn!(
                path = %path.display(),
                dropped = len - aligned,
                "truncating partial slot before append"
            );
            file.set_len(aligned)?;
        }
        file.seek(SeekFrom::Start(aligned))?;
        Ok(aligned)
    }

    fn check_slot(offset: u64, len: u64) -> Result<()> {
        let in_bounds = offset.checked_add(SLOT).map_or(false, |end| end <= len);
        if offset % SLOT != 0 || !in_bounds {
            return Err(SlotDbError::InvalidOffset { offset, len });
        }
        Ok(())
    }

    fn maybe_sync(&self, file: &File) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}
