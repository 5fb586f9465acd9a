//! Harbour Cache - expiring key-value cache for market data
//!
//! Serves slow or rate-limited upstream data (rates, harbours, species, the
//! last AI analysis) from durable local storage within a freshness window.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::{CacheConfig, CacheKey, ExpiringCache, Sourced};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
