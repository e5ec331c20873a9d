//! Entry Store Module
//!
//! Keyed storage for one record kind. Holds no lock and reads no clock:
//! the caller passes "now" and serializes access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;
use crate::error::CacheError;

// == Entry Store ==
/// Key to entry mapping for a single record kind.
#[derive(Debug)]
pub struct EntryStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for EntryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntryStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Get ==
    /// Looks up a live entry.
    ///
    /// An expired entry is reported as `Expired` and left in place for the
    /// sweep to remove.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Result<&V, CacheError> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => Err(CacheError::Expired(key.to_string())),
            Some(entry) => Ok(&entry.value),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Insert ==
    /// Stores an entry, replacing whatever the key held before.
    pub fn insert(&mut self, key: String, entry: CacheEntry<V>) {
        self.entries.insert(key, entry);
    }

    // == Sweep ==
    /// Removes every entry expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    /// Returns the raw entry, expired or not.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Length ==
    /// Returns the number of entries physically held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
