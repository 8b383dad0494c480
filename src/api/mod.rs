//! API Module
//!
//! Typed client for the PokeAPI REST service.
//!
//! # Endpoints
//! - `GET /location-area?offset=&limit=` - Page through location areas
//! - `GET /location-area/{name}/` - Pokemon encounters in one area
//! - `GET /pokemon/{name}` - Stats and types of one Pokemon

pub mod client;

pub use client::{PokeApi, LOCATION_PAGE_SIZE};
