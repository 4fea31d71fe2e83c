//! Durable key-value storage for the bill collection.
//!
//! The `Storage` trait is deliberately tiny: whole values are read and written under a string key,
//! and a write replaces whatever was there before. `FileStorage` keeps each key in its own JSON
//! file; `MemoryStorage` keeps everything in memory for tests.

use crate::{utils, Result};
use anyhow::bail;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{trace, warn};

/// A place where serialized state can be saved and restored by key.
#[async_trait::async_trait]
pub trait Storage {
    /// Returns the value saved under `key`, or `None` if nothing has been saved.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Saves `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        trace!("reading {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        trace!("writing {}", path.display());
        // The destination is only ever replaced by a complete file.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        utils::write(&tmp, value).await?;
        if let Err(e) = utils::rename(&tmp, &path).await {
            if let Err(remove_error) = tokio::fs::remove_file(&tmp).await {
                warn!("Unable to remove {}: {remove_error}", tmp.display());
            }
            return Err(e);
        }
        Ok(())
    }
}

/// An in-memory `Storage`. Clones share the same underlying map, which lets a test hand one clone
/// to a `BillStore` and inspect or tamper with the data through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with `value` directly.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.into(), value.into());
        }
    }

    /// Returns a copy of the value under `key`.
    pub fn value(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    /// When `fail` is true, every subsequent `set` returns an error and leaves the data untouched.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.lock().map(|flag| *flag).unwrap_or(false) {
            bail!("Writes to '{key}' are failing");
        }
        self.insert(key, value);
        Ok(())
    }
}
