//! Durable key-value storage and typed cells on top of it.
//!
//! [`KvStore`] is the raw string-keyed store. [`Persistent`] wraps one key
//! with a serde type and a default, so callers never see a missing or
//! corrupt entry.

pub mod sqlite;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// String-keyed durable storage. Writes are visible to the next read.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// A typed value stored under a fixed key, JSON-encoded.
pub struct Persistent<T> {
    store: Arc<dyn KvStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Persistent<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KvStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the stored value, or `default` when the key is absent, the
    /// store fails, or the stored text does not decode as `T`.
    pub fn read(&self, default: T) -> T {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key = self.key, error = %e, "failed to read persisted value");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = self.key, error = %e, "discarding unreadable persisted value");
                default
            }
        }
    }

    pub fn write(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("failed to encode value for {}", self.key))?;
        self.store
            .set(self.key, &json)
            .with_context(|| format!("failed to persist {}", self.key))
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(self.key)
    }
}
