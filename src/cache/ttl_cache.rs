//! TTL Cache Module
//!
//! The shared, thread-safe cache handle. Wraps a [`CacheStore`] in
//! `Arc<RwLock<_>>` and owns the reaper that expires its entries.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::tasks::{spawn_reaper, ReaperHandle, ReaperHealthSnapshot};

/// Floor for the scan interval. Tokio timers cannot tick with a zero period.
pub const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

// == Cache Config ==
/// Construction parameters for a [`TtlCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age past which an entry is removed by the reaper
    pub ttl: Duration,
    /// How often the reaper scans; None means once per ttl
    pub reap_interval: Option<Duration>,
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            reap_interval: None,
        }
    }

    pub fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = Some(interval);
        self
    }

    /// The interval the reaper actually runs at.
    pub fn effective_reap_interval(&self) -> Duration {
        self.reap_interval.unwrap_or(self.ttl).max(MIN_REAP_INTERVAL)
    }
}

// == TTL Cache ==
/// Time-bounded memoization of fetched response bodies.
///
/// Cloning yields another handle to the same entries and reaper. The reaper
/// stops once [`TtlCache::close`] is called or the last handle is dropped.
///
/// Reads do not check freshness. An entry can be returned up to one scan
/// interval after it outlived the ttl, until the next sweep removes it.
///
/// Must be constructed inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TtlCache {
    store: Arc<RwLock<CacheStore>>,
    reaper: Arc<ReaperHandle>,
    ttl: Duration,
    reap_interval: Duration,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a cache whose reaper scans once per `ttl`.
    ///
    /// A zero ttl is accepted and gives a pass-through cache: entries are
    /// dropped by the next sweep.
    pub fn new(ttl: Duration) -> Self {
        Self::with_config(CacheConfig::new(ttl))
    }

    pub fn with_config(config: CacheConfig) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(config.ttl)));
        let reap_interval = config.effective_reap_interval();
        let reaper = spawn_reaper(store.clone(), reap_interval);

        Self {
            store,
            reaper: Arc::new(reaper),
            ttl: config.ttl,
            reap_interval,
        }
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, stamping it with the current time.
    pub async fn put(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        let key = key.into();
        let payload = payload.into();
        self.store.write().await.put(key, payload);
    }

    // == Get ==
    /// Returns the payload stored under `key`, or None on a miss.
    ///
    /// Takes only the read lock, so lookups run alongside each other.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.store.read().await.get(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn reap_interval(&self) -> Duration {
        self.reap_interval
    }

    // == Health ==
    /// Reports whether the reaper is alive and sweeping on schedule.
    pub fn health(&self) -> ReaperHealthSnapshot {
        self.reaper.health().snapshot()
    }

    // == Close ==
    /// Stops the reaper and waits for it to exit.
    ///
    /// Entries stay readable and writable afterwards but no longer expire.
    pub async fn close(&self) {
        self.reaper.shutdown().await;
    }
}
