//! Background Tasks Module
//!
//! Contains the background work a cache runs for its whole lifetime.
//!
//! # Tasks
//! - TTL Reaper: removes entries older than the cache ttl on a fixed interval,
//!   supervised and observable through [`ReaperHealth`]

mod health;
mod reaper;

pub use health::{ReaperHealth, ReaperHealthSnapshot};
pub use reaper::{spawn_reaper, ReaperHandle};
