//! Cache Module
//!
//! Provides time-bounded in-memory caching of fetched response bodies with
//! background expiry.

mod entry;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_cache::{CacheConfig, TtlCache, MIN_REAP_INTERVAL};
