//! Expiring Cache Module
//!
//! Namespaced, best-effort TTL cache that writes through a `KeyValueStore`.
//! Nothing is mirrored in memory: every call is one store round trip, and
//! expired entries are reaped only by the read that finds them or by an
//! explicit clear or purge.

use std::sync::Arc;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::cache::CacheEntry;
use crate::error::Result;
use crate::store::KeyValueStore;

// == Public Constants ==
/// Prefix every key written by the cache carries in the backing store.
pub const DEFAULT_PREFIX: &str = "@harbour_cache:";

/// Lifetime of every entry unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// == Cache Config ==
/// Namespace and lifetime settings, fixed for the life of a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Prefix owned by this cache in the backing store
    pub prefix: String,
    /// TTL applied to every write
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            ttl: DEFAULT_TTL,
        }
    }
}

// == Expiring Cache ==
/// Put/get/clear over durable storage with time-based invalidation.
///
/// Failures are logged and absorbed: a failed read looks like a miss and a
/// failed write looks like data that was never cached.
pub struct ExpiringCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    stats: StatsRecorder,
}

impl ExpiringCache {
    // == Constructor ==
    /// Creates a cache over `store` using wall clock time.
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        mut config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // An empty prefix would claim every key in the store as ours.
        if config.prefix.is_empty() {
            warn!("Empty cache prefix, using {}", DEFAULT_PREFIX);
            config.prefix = DEFAULT_PREFIX.to_string();
        }
        info!(
            "Expiring cache ready: prefix={}, ttl={}s",
            config.prefix,
            config.ttl.as_secs()
        );
        Self {
            store,
            clock,
            config,
            stats: StatsRecorder::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    fn ttl_ms(&self) -> u64 {
        u64::try_from(self.config.ttl.as_millis()).unwrap_or(u64::MAX)
    }

    // == Set ==
    /// Stores `data` under `key`, replacing any earlier entry.
    ///
    /// Never fails from the caller's point of view.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        match self.write(key, data).await {
            Ok(()) => debug!("Cached '{}'", key),
            Err(e) => {
                self.stats.record_write_failure();
                warn!("Failed to cache '{}': {}", key, e);
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        let entry = CacheEntry::new(data, self.clock.now_ms(), self.ttl_ms());
        let text = serde_json::to_string(&entry)?;
        self.store.set_item(&self.storage_key(key), text).await
    }

    // == Get ==
    /// Returns the payload cached under `key` if present and fresh.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_entry(key).await.map(|entry| entry.data)
    }

    /// Returns the whole entry cached under `key` if present and fresh.
    ///
    /// An expired entry is deleted from the store and reported as a miss.
    pub async fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        match self.read(key).await {
            Ok(Some(entry)) => {
                self.stats.record_hit();
                Some(entry)
            }
            Ok(None) => {
                self.stats.record_miss();
                None
            }
            Err(e) => {
                self.stats.record_read_failure();
                self.stats.record_miss();
                warn!("Failed to read cached '{}': {}", key, e);
                None
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        let storage_key = self.storage_key(key);
        let Some(text) = self.store.get_item(&storage_key).await? else {
            return Ok(None);
        };

        // Expiry is decided before the payload is decoded, so a stale entry
        // is reaped even if its shape no longer matches `T`.
        let entry: CacheEntry<serde_json::Value> = serde_json::from_str(&text)?;
        if entry.is_expired_at(self.clock.now_ms()) {
            self.stats.record_expiration();
            debug!("Cached '{}' expired, removing", key);
            self.store.remove_item(&storage_key).await?;
            return Ok(None);
        }

        Ok(Some(CacheEntry {
            data: serde_json::from_value(entry.data)?,
            timestamp: entry.timestamp,
            expires_at: entry.expires_at,
        }))
    }

    // == Clear ==
    /// Removes `key`, or every key in this cache's namespace when `None`.
    ///
    /// Keys outside the namespace are never touched.
    pub async fn clear(&self, key: Option<&str>) {
        let result = match key {
            Some(key) => self.store.remove_item(&self.storage_key(key)).await,
            None => self.clear_namespace().await,
        };

        match (result, key) {
            (Ok(()), Some(key)) => debug!("Cleared cached '{}'", key),
            (Ok(()), None) => debug!("Cleared cache namespace {}", self.config.prefix),
            (Err(e), key) => {
                self.stats.record_write_failure();
                warn!("Failed to clear cache ({}): {}", key.unwrap_or("*"), e);
            }
        }
    }

    async fn clear_namespace(&self) -> Result<()> {
        let keys = self.namespaced_keys().await?;
        if keys.is_empty() {
            return Ok(());
        }
        self.store.multi_remove(&keys).await
    }

    async fn namespaced_keys(&self) -> Result<Vec<String>> {
        let keys = self.store.all_keys().await?;
        Ok(keys
            .into_iter()
            .filter(|key| key.starts_with(&self.config.prefix))
            .collect())
    }

    // == Keys ==
    /// Keys currently held in the namespace, without the prefix, sorted.
    ///
    /// Expired entries not yet reaped are included.
    pub async fn keys(&self) -> Vec<String> {
        match self.namespaced_keys().await {
            Ok(keys) => {
                let mut keys: Vec<String> = keys
                    .into_iter()
                    .map(|key| key[self.config.prefix.len()..].to_string())
                    .collect();
                keys.sort();
                keys
            }
            Err(e) => {
                self.stats.record_read_failure();
                warn!("Failed to list cache keys: {}", e);
                Vec::new()
            }
        }
    }

    // == Purge Expired ==
    /// Removes every expired or unreadable entry in the namespace.
    ///
    /// Returns the number of entries removed. Runs only when called.
    pub async fn purge_expired(&self) -> usize {
        match self.try_purge_expired().await {
            Ok(removed) => {
                if removed > 0 {
                    info!("Cache purge: removed {} stale entries", removed);
                } else {
                    debug!("Cache purge: no stale entries found");
                }
                removed
            }
            Err(e) => {
                warn!("Cache purge failed: {}", e);
                0
            }
        }
    }

    async fn try_purge_expired(&self) -> Result<usize> {
        let stale = match self.stale_keys().await {
            Ok(stale) => stale,
            Err(e) => {
                self.stats.record_read_failure();
                return Err(e);
            }
        };

        if !stale.is_empty() {
            if let Err(e) = self.store.multi_remove(&stale).await {
                self.stats.record_write_failure();
                return Err(e);
            }
        }
        Ok(stale.len())
    }

    async fn stale_keys(&self) -> Result<Vec<String>> {
        let now = self.clock.now_ms();
        let mut stale = Vec::new();

        for key in self.namespaced_keys().await? {
            let Some(text) = self.store.get_item(&key).await? else {
                continue;
            };
            let expired = serde_json::from_str::<CacheEntry<IgnoredAny>>(&text)
                .map(|entry| entry.is_expired_at(now))
                .unwrap_or(true);
            if expired {
                stale.push(key);
            }
        }
        Ok(stale)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
