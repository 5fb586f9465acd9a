//! Durable File Store
//!
//! Keeps every key in a single JSON object file. Each mutation rewrites the
//! file through a temp sibling and an atomic rename.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::KeyValueStore;
use crate::error::{CacheError, Result};

// == File Store ==
/// JSON-file backed store.
///
/// The map is held in memory and written through on every change; the
/// mutex is held across the write so the file never lags a completed call.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStore {
    // == Open ==
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first write. A file that is not a JSON object of strings is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let items = match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => HashMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Opened file store at {} with {} keys", path.display(), items.len());

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    async fn persist(&self, items: &HashMap<String, String>) -> Result<()> {
        let text = serde_json::to_string(items)?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| CacheError::Storage(format!("Invalid store path: {}", self.path.display())))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, text).await?;
        fs::rename(&tmp_path, &self.path).await?;

        debug!("Persisted {} keys to {}", items.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut items = self.items.lock().await;
        let previous = items.insert(key.to_string(), value);

        if let Err(e) = self.persist(&items).await {
            // Keep memory and disk in agreement when the write fails.
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().await;
        if let Some(old) = items.remove(key) {
            if let Err(e) = self.persist(&items).await {
                items.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        let mut items = self.items.lock().await;
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| items.remove(key).map(|value| (key.clone(), value)))
            .collect();

        if removed.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.persist(&items).await {
            items.extend(removed);
            return Err(e);
        }
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.items.lock().await.keys().cloned().collect())
    }
}
