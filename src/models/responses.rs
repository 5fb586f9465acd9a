//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for the GET operation (GET /cache/:key)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached value
    pub value: Value,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Expiry time (Unix milliseconds)
    pub expires_at: u64,
}

impl GetResponse {
    /// Creates a new GetResponse from a fresh entry
    pub fn new(key: impl Into<String>, entry: CacheEntry<Value>) -> Self {
        Self {
            key: key.into(),
            value: entry.data,
            timestamp: entry.timestamp,
            expires_at: entry.expires_at,
        }
    }
}

/// Response body for the SET operation (PUT /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was cleared
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cleared", key),
            key,
        }
    }
}

/// Response body for the blanket clear (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new(prefix: &str) -> Self {
        Self {
            message: format!("Cleared all keys under '{}'", prefix),
        }
    }
}

/// Response body for key listing (GET /cache)
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Response body for the purge operation (POST /cache/purge)
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Number of stale entries removed
    pub removed: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries removed on read after expiring
    pub expirations: u64,
    /// Number of reads that failed and were treated as misses
    pub read_failures: u64,
    /// Number of writes that failed and were dropped
    pub write_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            read_failures: stats.read_failures,
            write_failures: stats.write_failures,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
