//! Read-through fetching with an explicit degraded result.

use std::fmt::Display;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::ExpiringCache;

// == Sourced ==
/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    /// Served fresh from the cache
    Cached(T),
    /// Fetched from upstream just now, and cached
    Live(T),
    /// Upstream failed; caller-provided substitute data
    Fallback { data: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn data(&self) -> &T {
        match self {
            Sourced::Cached(data) | Sourced::Live(data) => data,
            Sourced::Fallback { data, .. } => data,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Cached(data) | Sourced::Live(data) => data,
            Sourced::Fallback { data, .. } => data,
        }
    }

    /// True when the data is a substitute for a failed fetch.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Sourced::Fallback { .. })
    }
}

impl ExpiringCache {
    // == Get Or Fetch ==
    /// Serves `key` from the cache, otherwise from `fetch`.
    ///
    /// A successful fetch is cached. A failed fetch yields `fallback()` and is
    /// not cached, so the next call tries upstream again.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        fetch: F,
        fallback: impl FnOnce() -> T,
    ) -> Sourced<T>
    where
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.get(key).await {
            return Sourced::Cached(data);
        }

        match fetch().await {
            Ok(data) => {
                self.set(key, &data).await;
                Sourced::Live(data)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Fetch for '{}' failed, serving fallback: {}", key, reason);
                Sourced::Fallback {
                    data: fallback(),
                    reason,
                }
            }
        }
    }
}
