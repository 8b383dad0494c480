//! Cache Store Module
//!
//! Unsynchronised cache engine: a HashMap of stamped payloads plus a fixed ttl.
//! Sharing and the background reaper live in [`super::TtlCache`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Keyed storage of response bodies with a single shared time-to-live.
///
/// Lookups take `&self`; their hit and miss counters are atomic so any
/// number of readers can share one read lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lookups that found an entry
    hits: AtomicU64,
    /// Lookups that found nothing
    misses: AtomicU64,
    /// Entries removed for outliving the ttl
    expirations: u64,
    /// Age past which the reaper removes an entry
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. A zero `ttl` is accepted: every entry becomes
    /// eligible for removal as soon as any time has passed.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: 0,
            ttl,
        }
    }

    // == Put ==
    /// Stores `payload` under `key` with a fresh timestamp.
    ///
    /// An existing entry for the key is replaced outright, value and
    /// timestamp both. Empty keys and empty payloads are valid.
    pub fn put(&mut self, key: impl Into<String>, payload: Bytes) {
        self.entries.insert(key.into(), CacheEntry::new(payload));
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// Freshness is not checked here. An entry older than the ttl is still
    /// returned until a sweep removes it.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Remove Expired ==
    /// Removes every entry whose age strictly exceeds the ttl.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - self.entries.len();

        self.expirations += removed as u64;
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations,
            total_entries: self.entries.len(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
