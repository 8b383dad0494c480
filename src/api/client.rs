//! PokeAPI Client
//!
//! Typed endpoints over a [`CachedFetcher`]. Every request is keyed in the
//! cache by its full URL, so repeated pages and lookups skip the network.

use serde::de::DeserializeOwned;

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetch::{CachedFetcher, Transport};
use crate::models::{LocationArea, LocationAreaPage, Pokemon};

/// Page size used for the first `map` request.
pub const LOCATION_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct PokeApi<T> {
    fetcher: CachedFetcher<T>,
    base_url: String,
}

impl<T: Transport> PokeApi<T> {
    /// Creates a client rooted at `base_url` (e.g. `https://pokeapi.co/api/v2`).
    pub fn new(fetcher: CachedFetcher<T>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    pub fn cache(&self) -> &TtlCache {
        self.fetcher.cache()
    }

    pub fn first_location_page_url(&self) -> String {
        format!(
            "{}/location-area?offset=0&limit={}",
            self.base_url, LOCATION_PAGE_SIZE
        )
    }

    /// Fetches one page of location areas. `url` is either the first page URL
    /// or a `next`/`previous` link from an earlier page.
    pub async fn location_areas(&self, url: &str) -> Result<LocationAreaPage> {
        self.get_json(url).await
    }

    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        let url = format!("{}/location-area/{}/", self.base_url, name);
        self.get_json(&url).await
    }

    pub async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.get_json(&url).await
    }

    async fn get_json<D: DeserializeOwned>(&self, url: &str) -> Result<D> {
        let body = self.fetcher.get(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
