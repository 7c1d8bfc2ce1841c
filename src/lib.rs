//! # SlotDB
//!
//! A minimal persistent key-indexed record store with:
//! - Fixed-width 68-byte record slots appended to a data file
//! - A sorted key → offset index persisted to its own file
//! - Binary-search lookups followed by one direct-offset read
//! - Explicit little-endian on-disk layout, no headers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Shell (CLI / UI collaborator)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Command / Response
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │       (add / search / edit / remove / generate / clear)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Index    │─offset──▶│  Data File  │
//!   │  (sorted)   │          │  (slots)    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!     index.idx              database.dat
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod store;
pub mod shared;
pub mod command;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlotDbError, Result};
pub use config::{Config, PayloadMode, SyncStrategy};
pub use record::Record;
pub use storage::IndexEntry;
pub use store::{CompactionStats, SearchOutcome, SearchSample, Store, SEARCH_COMPLEXITY};
pub use shared::SharedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlotDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
