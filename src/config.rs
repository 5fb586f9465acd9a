//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_PREFIX, DEFAULT_TTL};

/// Largest TTL whose millisecond value still fits in a `u64` timestamp.
pub const MAX_TTL_SECS: u64 = u64::MAX / 1000;

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Time-to-live in seconds applied to every cached entry
    pub ttl_secs: u64,
    /// Namespace prefix for every key the cache writes
    pub prefix: String,
    /// Path of the JSON file backing the durable store
    pub store_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds, 1..=`MAX_TTL_SECS` (default: 86400)
    /// - `CACHE_PREFIX` - Key namespace prefix (default: `@harbour_cache:`)
    /// - `CACHE_STORE_PATH` - Backing file (default: `harbour_cache.json`)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source. Unset, unparsable or
    /// out-of-range values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            ttl_secs: lookup("CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|ttl| (1..=MAX_TTL_SECS).contains(ttl))
                .unwrap_or(defaults.ttl_secs),
            prefix: lookup("CACHE_PREFIX")
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.prefix),
            store_path: lookup("CACHE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            prefix: self.prefix.clone(),
            ttl: Duration::from_secs(self.ttl_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL.as_secs(),
            prefix: DEFAULT_PREFIX.to_string(),
            store_path: PathBuf::from("harbour_cache.json"),
            server_port: 3000,
        }
    }
}
