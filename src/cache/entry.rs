//! Cache Entry Module
//!
//! Defines a single cached response body stamped with its insertion time.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// A cached payload and the monotonic instant it was stored at.
///
/// The payload is immutable once stored. Callers receive cheap clones of the
/// underlying buffer, never a mutable view.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body
    pub payload: Bytes,
    /// Insertion timestamp (monotonic clock)
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(payload: Bytes) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
        }
    }

    // == Age ==
    /// Returns how long ago the entry was stored.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals `ttl` exactly is still
    /// live. Only an age strictly greater than `ttl` counts as expired.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}
