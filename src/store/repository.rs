//! Typed access to the key-value store
//!
//! Reads never fail: a missing key, a store error, or an unparseable value
//! all yield the type's default so startup is never blocked.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{KeyValueStore, MemoryStore, StoreKey};

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Load a value, falling back to `T::default()`
    pub fn load<T>(&self, key: StoreKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {:#}", key.as_str(), e);
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding unparseable value for {}: {}", key.as_str(), e);
                T::default()
            }
        }
    }

    /// Load a value, falling back to a caller-supplied initial value
    pub fn load_or<T>(&self, key: StoreKey, initial: impl FnOnce() -> T) -> T
    where
        T: DeserializeOwned,
    {
        match self.store.get(key.as_str()) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unparseable value for {}: {}", key.as_str(), e);
                initial()
            }),
            Ok(None) => initial(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {:#}", key.as_str(), e);
                initial()
            }
        }
    }

    /// Write the full value for a key
    pub fn save<T>(&self, key: StoreKey, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize {}", key.as_str()))?;
        self.store.set(key.as_str(), &raw)
    }

    /// Load, mutate, and write back a value in one step
    pub fn update<T, R>(&self, key: StoreKey, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let mut value: T = self.load(key);
        let out = f(&mut value);
        self.save(key, &value)?;
        Ok(out)
    }

    pub fn remove(&self, key: StoreKey) -> Result<()> {
        self.store.remove(key.as_str())
    }
}
