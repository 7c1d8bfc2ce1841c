//! Record encoding and decoding

use bytes::{Buf, BufMut};

use crate::config::PayloadMode;
use crate::error::{Result, SlotDbError};

use super::{MAX_TEXT_LEN, PAYLOAD_CAPACITY, SLOT_SIZE};

/// One fixed-width record: an integer key and a bounded text payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    key: i32,
    payload: [u8; PAYLOAD_CAPACITY],
}

impl Record {
    /// Build a record, silently truncating `text` to [`MAX_TEXT_LEN`] bytes
    pub fn encode(key: i32, text: &str) -> Self {
        let len = truncation_point(text);
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        payload[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self { key, payload }
    }

    /// Build a record, rejecting text that would need truncation
    pub fn encode_strict(key: i32, text: &str) -> Result<Self> {
        if text.len() > MAX_TEXT_LEN {
            return Err(SlotDbError::PayloadTooLarge {
                len: text.len(),
                capacity: MAX_TEXT_LEN,
            });
        }
        Ok(Self::encode(key, text))
    }

    /// Build a record according to the configured payload mode
    pub fn encode_with(key: i32, text: &str, mode: PayloadMode) -> Result<Self> {
        match mode {
            PayloadMode::Truncate => Ok(Self::encode(key, text)),
            PayloadMode::Strict => Self::encode_strict(key, text),
        }
    }

    /// Split the record back into key and text
    pub fn decode(&self) -> (i32, String) {
        (self.key, self.text())
    }

    /// The record key
    pub fn key(&self) -> i32 {
        self.key
    }

    /// Payload text up to the first zero byte
    ///
    /// Bytes that are not valid UTF-8 (only possible in files written by
    /// other tools) are replaced with U+FFFD.
    pub fn text(&self) -> String {
        let end = self
            .payload
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PAYLOAD_CAPACITY);
        String::from_utf8_lossy(&self.payload[..end]).into_owned()
    }

    /// Raw payload bytes
    pub fn payload(&self) -> &[u8; PAYLOAD_CAPACITY] {
        &self.payload
    }

    /// Serialize to the on-disk slot layout
    pub fn to_bytes(&self) -> [u8; SLOT_SIZE] {
        let mut slot = [0u8; SLOT_SIZE];
        let mut buf = &mut slot[..];
        buf.put_i32_le(self.key);
        buf.put_slice(&self.payload);
        slot
    }

    /// Deserialize from the on-disk slot layout
    pub fn from_bytes(slot: &[u8; SLOT_SIZE]) -> Self {
        let mut buf = &slot[..];
        let key = buf.get_i32_le();
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        buf.copy_to_slice(&mut payload);
        Self { key, payload }
    }
}

/// Number of leading bytes of `text` that fit, never splitting a character
fn truncation_point(text: &str) -> usize {
    if text.len() <= MAX_TEXT_LEN {
        return text.len();
    }
    let mut end = MAX_TEXT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}
