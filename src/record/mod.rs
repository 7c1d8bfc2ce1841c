//! Record Module
//!
//! Fixed-width binary layout for one stored record.
//!
//! ## Slot Format
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Key (4, LE)  │ Payload (64)                                 │
//! │ i32          │ UTF-8 text, zero-terminated, zero-filled     │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Every slot is exactly [`SLOT_SIZE`] bytes. There is no header, length
//! prefix or padding, so a data file is a plain array of slots.
//!
//! ## Truncation
//! At most [`MAX_TEXT_LEN`] bytes of text are kept. Longer input is cut at
//! the last UTF-8 character boundary that fits, so decoding never yields a
//! split character. The byte after the copied text is always zero.

mod codec;

pub use codec::Record;

/// Size of the encoded key in bytes
pub const KEY_SIZE: usize = 4;

/// Size of the text payload buffer, including the terminating zero
pub const PAYLOAD_CAPACITY: usize = 64;

/// Maximum number of usable text bytes in a payload
pub const MAX_TEXT_LEN: usize = PAYLOAD_CAPACITY - 1;

/// On-disk size of one record slot: key (4) + payload (64) = 68 bytes
pub const SLOT_SIZE: usize = KEY_SIZE + PAYLOAD_CAPACITY;
