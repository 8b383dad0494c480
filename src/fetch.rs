//! Cached Fetch Module
//!
//! Network access for the client. Every request goes through [`CachedFetcher`],
//! which answers from the [`TtlCache`] when it can and otherwise asks its
//! [`Transport`] and stores the body for later lookups.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::cache::TtlCache;
use crate::error::{PokedexError, Result};

// == Transport ==
/// Fetches the raw body behind a URL.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes>> + Send;
}

// == HTTP Transport ==
/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PokedexError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.bytes().await?)
    }
}

// == Cached Fetcher ==
/// Read-through cache in front of a [`Transport`].
///
/// Only successful responses are cached. Failed fetches are retried on the
/// next call.
#[derive(Debug, Clone)]
pub struct CachedFetcher<T> {
    cache: TtlCache,
    transport: T,
}

impl<T: Transport> CachedFetcher<T> {
    pub fn new(cache: TtlCache, transport: T) -> Self {
        Self { cache, transport }
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    // == Get ==
    /// Returns the body for `url`, from the cache on a hit or the network on a miss.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, url: &str) -> Result<Bytes> {
        if let Some(body) = self.cache.get(url).await {
            debug!("cache hit");
            return Ok(body);
        }

        debug!("cache miss, fetching");
        let body = self.transport.fetch(url).await?;
        self.cache.put(url, body.clone()).await;
        Ok(body)
    }
}
