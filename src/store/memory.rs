//! In-memory backing store, used by tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::Result;

// == Memory Store ==
/// `HashMap` behind a tokio `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held, regardless of owner.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Direct inspection, bypassing any cache layered on top.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.items.read().await.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(key);
        }
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}
