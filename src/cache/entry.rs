//! Cache Entry Module
//!
//! Defines the envelope stored for every cached value.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload with its write time and expiry, in epoch milliseconds.
///
/// Serialized as `{"data": …, "timestamp": …, "expiresAt": …}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// Caller-defined payload
    pub data: T,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Expiration timestamp (Unix milliseconds), always `timestamp + ttl`
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that lives for `ttl_ms`.
    pub fn new(data: T, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now_ms`.
    ///
    /// Boundary condition: an entry is still fresh at exactly `expires_at`
    /// and expired from the next millisecond on.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds at `now_ms`, zero once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}
