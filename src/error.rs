//! Error types for SlotDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlotDbError
pub type Result<T> = std::result::Result<T, SlotDbError>;

/// Unified error type for SlotDB operations
#[derive(Debug, Error)]
pub enum SlotDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Offset {offset} is not the start of a slot (data file is {len} bytes)")]
    InvalidOffset { offset: u64, len: u64 },

    #[error("Short read at offset {offset}: slot is incomplete")]
    ShortRead { offset: u64 },

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Index references unreadable slot for key {key} at offset {offset}")]
    CorruptIndex { key: i32, offset: i64 },

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("Payload of {len} bytes exceeds capacity of {capacity} bytes")]
    PayloadTooLarge { len: usize, capacity: usize },

    // -------------------------------------------------------------------------
    // Argument / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
