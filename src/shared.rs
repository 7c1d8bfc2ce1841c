//! Shared Store
//!
//! A `Store` behind a mutex so a multi-threaded host can hand the same store
//! to several threads. Every call holds the lock for the whole operation,
//! which keeps the single-caller assumption of `Store` true.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use crate::command::{Command, Response};
use crate::error::Result;
use crate::record::Record;
use crate::storage::IndexEntry;
use crate::store::{SearchOutcome, Store};

/// Cloneable, thread-safe handle to one store
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn add(&self, key: i32, text: &str) -> Result<bool> {
        self.inner.lock().add(key, text)
    }

    pub fn search(&self, key: i32) -> Result<SearchOutcome> {
        self.inner.lock().search(key)
    }

    pub fn edit(&self, key: i32, text: &str) -> Result<bool> {
        self.inner.lock().edit(key, text)
    }

    pub fn remove(&self, key: i32) -> Result<bool> {
        self.inner.lock().remove(key)
    }

    pub fn generate_random<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<()> {
        self.inner.lock().generate_random(count, rng)
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.lock().clear()
    }

    pub fn list_index(&self) -> Vec<IndexEntry> {
        self.inner.lock().list_index()
    }

    pub fn list_records(&self) -> Result<Vec<Record>> {
        self.inner.lock().list_records()
    }

    pub fn execute<R: Rng + ?Sized>(&self, command: Command, rng: &mut R) -> Result<Response> {
        self.inner.lock().execute(command, rng)
    }

    /// Run `f` with exclusive access, for multi-step sequences that must not interleave
    pub fn with<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut store = self.inner.lock();
        f(&mut *store)
    }
}
