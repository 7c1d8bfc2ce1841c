//! Storage Module
//!
//! The two on-disk structures behind a store and the in-memory index.
//!
//! ## Responsibilities
//! - Append and overwrite fixed-width record slots in the data file
//! - Keep the key → offset index sorted and unique in memory
//! - Persist the index to its own file and reload it on startup
//!
//! ## File Formats
//! ```text
//! database.dat                         index.idx
//! ┌───────────┬──────────────┐         ┌───────────┬──────────────┐
//! │ Key (4)   │ Payload (64) │ slot 0  │ Key (4)   │ Offset (8)   │ entry 0
//! ├───────────┼──────────────┤         ├───────────┼──────────────┤
//! │ Key (4)   │ Payload (64) │ slot 1  │ Key (4)   │ Offset (8)   │ entry 1
//! └───────────┴──────────────┘         └───────────┴──────────────┘
//!   68 bytes per slot, append order      12 bytes per entry, key order
//! ```
//!
//! All integers are little-endian. Neither file has a header.
//!
//! File handles are opened per operation and dropped before returning, so
//! nothing stays open between calls.

mod data_file;
mod index;
mod index_file;

pub use data_file::DataFile;
pub use index::{Index, IndexEntry, Lookup, INDEX_ENTRY_SIZE};
pub use index_file::IndexFile;
