//! # Typed persistent store
//!
//! `read` and `write` never fail the caller. A missing, unreadable or corrupt
//! record reads as the caller's default; a failed write is logged and the
//! value is still kept in the in-memory mirror for the rest of the process.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use dashmap::DashMap;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::backend::{Backend, MemoryBackend, SqliteBackend};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Published after every write or removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub key: String,
}

#[derive(Clone)]
pub struct PersistentStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Box<dyn Backend>,
    mirror: DashMap<String, Value>,
    changes: broadcast::Sender<StoreChange>,
}

impl PersistentStore {
    pub fn new(backend: impl Backend + 'static) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                backend: Box::new(backend),
                mirror: DashMap::new(),
                changes,
            }),
        }
    }

    /// Open the sqlite database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SqliteBackend::open(path)?))
    }

    /// Open the sqlite database, or fall back to a process-local store if it
    /// cannot be opened. Callers keep working; nothing is persisted.
    pub fn open_or_volatile(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match SqliteBackend::open(path) {
            Ok(backend) => Self::new(backend),
            Err(e) => {
                error!(
                    "Storage unavailable at {}: {e}. Data will not survive a restart.",
                    path.display()
                );
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Read the value under `key`, or `default` when absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_value(key) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Stored value for '{key}' has an unexpected shape ({e}); using default");
                default
            }),
            None => default,
        }
    }

    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key, T::default())
    }

    /// Raw JSON under `key`, consulting the mirror before the backend
    pub fn read_value(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.inner.mirror.get(key) {
            return Some(value.value().clone());
        }

        let text = match self.inner.backend.load(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to load '{key}' from storage: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                self.inner.mirror.insert(key.to_string(), value.clone());
                Some(value)
            }
            Err(e) => {
                warn!("Corrupt record under '{key}' treated as absent: {e}");
                None
            }
        }
    }

    /// Replace the whole value under `key`
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                error!("Refusing to store unserializable value for '{key}': {e}");
                return;
            }
        };

        if let Err(e) = self.inner.backend.save(key, &value.to_string()) {
            warn!("Failed to persist '{key}': {e}. Keeping it in memory only.");
        } else {
            debug!("Persisted '{key}'");
        }

        self.inner.mirror.insert(key.to_string(), value);
        self.notify(key);
    }

    /// Drop `key` entirely; a no-op when absent
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.backend.delete(key) {
            warn!("Failed to delete '{key}' from storage: {e}");
        }
        self.inner.mirror.remove(key);
        self.notify(key);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.changes.subscribe()
    }

    fn notify(&self, key: &str) {
        // No receivers is fine
        let _ = self.inner.changes.send(StoreChange {
            key: key.to_string(),
        });
    }
}
