//! Tests for command execution
//!
//! These tests verify:
//! - Each command routes to the matching store operation
//! - Response success flags and display text

use rand::rngs::StdRng;
use rand::SeedableRng;
use slotdb::command::{Command, Response};
use slotdb::Store;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (TempDir, Store, StdRng) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path()).unwrap();
    (temp_dir, store, StdRng::seed_from_u64(17))
}

fn add(key: i32, text: &str) -> Command {
    Command::Add {
        key,
        text: text.to_string(),
    }
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_execute_add_and_search() {
    let (_temp, mut store, mut rng) = setup();

    let added = store.execute(add(1, "hello"), &mut rng).unwrap();
    assert_eq!(added, Response::Added { key: 1, inserted: true });
    assert!(added.is_success());

    let found = store.execute(Command::Search { key: 1 }, &mut rng).unwrap();
    match found {
        Response::Found { key, outcome } => {
            assert_eq!(key, 1);
            assert_eq!(outcome.text.as_deref(), Some("hello"));
            assert_eq!(outcome.comparisons, 1);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_execute_duplicate_add_is_not_success() {
    let (_temp, mut store, mut rng) = setup();
    store.execute(add(1, "a"), &mut rng).unwrap();

    let response = store.execute(add(1, "b"), &mut rng).unwrap();

    assert_eq!(response, Response::Added { key: 1, inserted: false });
    assert!(!response.is_success());
    assert_eq!(response.to_string(), "Key 1 already exists");
}

#[test]
fn test_execute_edit_and_remove() {
    let (_temp, mut store, mut rng) = setup();
    store.execute(add(3, "x"), &mut rng).unwrap();

    let edited = store
        .execute(
            Command::Edit {
                key: 3,
                text: "y".to_string(),
            },
            &mut rng,
        )
        .unwrap();
    assert_eq!(edited, Response::Edited { key: 3, updated: true });

    let removed = store.execute(Command::Remove { key: 3 }, &mut rng).unwrap();
    assert_eq!(removed, Response::Removed { key: 3, removed: true });

    let again = store.execute(Command::Remove { key: 3 }, &mut rng).unwrap();
    assert!(!again.is_success());
    assert_eq!(again.to_string(), "Key 3 not found");
}

#[test]
fn test_execute_generate_list_and_clear() {
    let (_temp, mut store, mut rng) = setup();

    let generated = store
        .execute(Command::Generate { count: 20 }, &mut rng)
        .unwrap();
    assert_eq!(generated, Response::Generated { count: 20 });

    match store.execute(Command::ListIndex, &mut rng).unwrap() {
        Response::Index(entries) => assert_eq!(entries.len(), 20),
        other => panic!("unexpected response: {:?}", other),
    }
    match store.execute(Command::ListRecords, &mut rng).unwrap() {
        Response::Records(records) => assert_eq!(records.len(), 20),
        other => panic!("unexpected response: {:?}", other),
    }

    let cleared = store.execute(Command::Clear, &mut rng).unwrap();
    assert_eq!(cleared, Response::Cleared);
    assert!(store.is_empty());
}

#[test]
fn test_execute_sample_and_compact() {
    let (_temp, mut store, mut rng) = setup();
    store
        .execute(Command::Generate { count: 100 }, &mut rng)
        .unwrap();
    let first = store.list_index()[0].key;
    store.execute(Command::Remove { key: first }, &mut rng).unwrap();

    match store.execute(Command::Sample { samples: 10 }, &mut rng).unwrap() {
        Response::Sample(sample) => {
            assert_eq!(sample.samples, 10);
            assert!(sample.max_comparisons <= 7);
        }
        other => panic!("unexpected response: {:?}", other),
    }

    match store.execute(Command::Compact, &mut rng).unwrap() {
        Response::Compacted(stats) => {
            assert_eq!(stats.live_slots, 99);
            assert_eq!(stats.reclaimed_bytes, 68);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_execute_complexity() {
    let (_temp, mut store, mut rng) = setup();

    let response = store.execute(Command::Complexity, &mut rng).unwrap();

    assert!(response.to_string().starts_with("Complexity:\nTime Complexity of Search:"));
}

// =============================================================================
// Display Tests
// =============================================================================

#[test]
fn test_display_search_messages() {
    let (_temp, mut store, mut rng) = setup();
    store.execute(add(8, "eight"), &mut rng).unwrap();

    let hit = store.execute(Command::Search { key: 8 }, &mut rng).unwrap();
    let miss = store.execute(Command::Search { key: 9 }, &mut rng).unwrap();

    assert_eq!(hit.to_string(), "Found: key=8, data=eight (comparisons: 1)");
    assert_eq!(miss.to_string(), "Not found: key=9 (comparisons: 1)");
}

#[test]
fn test_mutation_classification() {
    assert!(add(1, "a").is_mutation());
    assert!(Command::Clear.is_mutation());
    assert!(Command::Compact.is_mutation());
    assert!(!Command::Search { key: 1 }.is_mutation());
    assert!(!Command::ListRecords.is_mutation());
    assert!(!Command::Complexity.is_mutation());
}
