//! Pokedex - a terminal Pokedex client
//!
//! Explores the PokeAPI from an interactive prompt. Every response body is
//! memoized in a time-bounded cache whose background reaper expires entries
//! after a fixed ttl.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod repl;
pub mod tasks;

pub use api::PokeApi;
pub use cache::{CacheConfig, TtlCache};
pub use config::Config;
pub use error::{PokedexError, Result};
pub use fetch::{CachedFetcher, HttpTransport, Transport};
pub use repl::Session;
