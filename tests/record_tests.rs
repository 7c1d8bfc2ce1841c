//! Tests for the Record codec
//!
//! These tests verify:
//! - Slot layout (key bytes, zero-terminated payload)
//! - Truncation at 63 bytes and at UTF-8 boundaries
//! - Strict payload mode

use slotdb::config::PayloadMode;
use slotdb::record::{Record, MAX_TEXT_LEN, PAYLOAD_CAPACITY, SLOT_SIZE};
use slotdb::SlotDbError;

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_slot_size_is_68_bytes() {
    assert_eq!(SLOT_SIZE, 68);
    assert_eq!(PAYLOAD_CAPACITY, 64);
    assert_eq!(MAX_TEXT_LEN, 63);
}

#[test]
fn test_encode_layout_little_endian() {
    let record = Record::encode(0x0102_0304, "hi");
    let bytes = record.to_bytes();

    assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&bytes[4..6], b"hi");
    assert!(bytes[6..].iter().all(|&b| b == 0));
}

#[test]
fn test_negative_key_layout() {
    let record = Record::encode(-1, "");
    let bytes = record.to_bytes();

    assert_eq!(&bytes[0..4], &[0xFF; 4]);
    assert_eq!(Record::from_bytes(&bytes).key(), -1);
}

#[test]
fn test_from_bytes_reads_key_and_text() {
    let mut slot = [0u8; SLOT_SIZE];
    slot[0..4].copy_from_slice(&42i32.to_le_bytes());
    slot[4..9].copy_from_slice(b"hello");

    let record = Record::from_bytes(&slot);

    assert_eq!(record.decode(), (42, "hello".to_string()));
}

#[test]
fn test_text_stops_at_first_zero() {
    let record = Record::encode(1, "ab\0cd");

    assert_eq!(record.text(), "ab");
}

#[test]
fn test_empty_text() {
    let record = Record::encode(3, "");

    assert_eq!(record.text(), "");
    assert!(record.payload().iter().all(|&b| b == 0));
}

// =============================================================================
// Truncation Tests
// =============================================================================

#[test]
fn test_exactly_63_bytes_kept_whole() {
    let text = "x".repeat(MAX_TEXT_LEN);
    let record = Record::encode(1, &text);

    assert_eq!(record.text(), text);
    assert_eq!(record.payload()[MAX_TEXT_LEN], 0);
}

#[test]
fn test_long_ascii_truncated_to_63_bytes() {
    let text: String = ('a'..='z').cycle().take(100).collect();
    let record = Record::encode(1, &text);

    assert_eq!(record.text(), &text[..63]);
    assert_eq!(record.payload()[63], 0);
}

#[test]
fn test_truncation_does_not_split_multibyte_char() {
    // 62 ASCII bytes followed by a 3-byte character straddling the limit
    let text = format!("{}€tail", "a".repeat(62));
    let record = Record::encode(1, &text);

    assert_eq!(record.text(), "a".repeat(62));
    assert!(record.payload()[62..].iter().all(|&b| b == 0));
}

#[test]
fn test_multibyte_char_fitting_exactly_is_kept() {
    let text = format!("{}€", "a".repeat(60));
    assert_eq!(text.len(), 63);

    let record = Record::encode(1, &text);

    assert_eq!(record.text(), text);
}

// =============================================================================
// Strict Mode Tests
// =============================================================================

#[test]
fn test_strict_rejects_oversized_text() {
    let text = "y".repeat(64);
    let result = Record::encode_strict(1, &text);

    assert!(matches!(
        result,
        Err(SlotDbError::PayloadTooLarge { len: 64, capacity: 63 })
    ));
}

#[test]
fn test_strict_accepts_text_that_fits() {
    let record = Record::encode_strict(1, "fits").unwrap();

    assert_eq!(record.text(), "fits");
}

#[test]
fn test_encode_with_follows_mode() {
    let text = "z".repeat(80);

    let truncated = Record::encode_with(5, &text, PayloadMode::Truncate).unwrap();
    assert_eq!(truncated.text().len(), 63);

    assert!(Record::encode_with(5, &text, PayloadMode::Strict).is_err());
}
