//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::{PokedexError, Result};

/// Default PokeAPI root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time-to-live of cached responses in seconds
    pub cache_ttl: u64,
    /// Reaper scan interval in seconds, None to scan once per ttl
    pub reap_interval: Option<u64>,
    /// Root URL of the PokeAPI
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POKEDEX_CACHE_TTL_SECS` - Cache ttl in seconds (default: 60)
    /// - `POKEDEX_REAP_INTERVAL_SECS` - Reaper interval in seconds (default: the ttl)
    /// - `POKEAPI_BASE_URL` - API root (default: https://pokeapi.co/api/v2)
    /// - `POKEDEX_HTTP_TIMEOUT_SECS` - HTTP timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: lookup("POKEDEX_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            reap_interval: lookup("POKEDEX_REAP_INTERVAL_SECS").and_then(|v| v.parse().ok()),
            base_url: lookup("POKEAPI_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            http_timeout: lookup("POKEDEX_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout),
        }
    }

    // == Validate ==
    /// Rejects values the client cannot run with.
    ///
    /// A zero cache ttl is allowed and turns the cache into a pass-through.
    /// The ttl and reap interval have no upper bound; a ttl of `u64::MAX`
    /// seconds means entries never expire.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PokedexError::Config(format!(
                "base url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.http_timeout == 0 {
            return Err(PokedexError::Config(
                "http timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::new(Duration::from_secs(self.cache_ttl));
        match self.reap_interval {
            Some(secs) => config.with_reap_interval(Duration::from_secs(secs)),
            None => config,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 60,
            reap_interval: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_ttl, 60);
        assert_eq!(config.reap_interval, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http_timeout, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("POKEDEX_CACHE_TTL_SECS", "5"),
            ("POKEDEX_REAP_INTERVAL_SECS", "1"),
            ("POKEAPI_BASE_URL", "http://localhost:8080/api/v2/"),
            ("POKEDEX_HTTP_TIMEOUT_SECS", "3"),
        ]));

        assert_eq!(config.cache_ttl, 5);
        assert_eq!(config.reap_interval, Some(1));
        assert_eq!(config.base_url, "http://localhost:8080/api/v2");
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_ignores_unparseable_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("POKEDEX_CACHE_TTL_SECS", "soon"),
            ("POKEDEX_REAP_INTERVAL_SECS", "-1"),
        ]));

        assert_eq!(config.cache_ttl, 60);
        assert_eq!(config.reap_interval, None);
    }

    #[test]
    fn test_cache_config_interval_defaults_to_ttl() {
        let config = Config::default();
        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(cache.effective_reap_interval(), Duration::from_secs(60));

        let config = Config {
            reap_interval: Some(2),
            ..Config::default()
        };
        assert_eq!(
            config.cache_config().effective_reap_interval(),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            base_url: "pokeapi.co".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PokedexError::Config(_))));

        let config = Config {
            http_timeout: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PokedexError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_ttl_builds_a_working_cache() {
        let max = u64::MAX.to_string();
        let config = Config::from_lookup(lookup_from(&[
            ("POKEDEX_CACHE_TTL_SECS", max.as_str()),
            ("POKEDEX_REAP_INTERVAL_SECS", max.as_str()),
        ]));
        assert!(config.validate().is_ok());

        let cache = crate::cache::TtlCache::with_config(config.cache_config());
        cache.put("k", "v").await;
        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert!(cache.health().is_healthy());
        assert!(cache.get("k").await.is_some());
        cache.close().await;
    }

    #[test]
    fn test_validate_accepts_zero_ttl() {
        let config = Config {
            cache_ttl: 0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
