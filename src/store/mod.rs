//! Backing Store Module
//!
//! Durable, string-keyed key-value stores the expiring cache writes through.
//! A store knows nothing about prefixes or expiry; it only moves text.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Key Value Store ==
/// Asynchronous string-keyed storage.
///
/// Single-key operations are atomic with respect to each other; nothing
/// stronger is promised.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the text stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every key in `keys` as one batch.
    async fn multi_remove(&self, keys: &[String]) -> Result<()>;

    /// Lists every key currently in the store.
    async fn all_keys(&self) -> Result<Vec<String>>;
}
