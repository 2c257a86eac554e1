use crate::cache::{CacheBackend, CacheError, SecretStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Process-local cache backend
///
/// Entries live until the process exits or [`CacheBackend::clear`] is called.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<(String, String), (String, DateTime<Utc>)>>,
    secrets: RwLock<HashMap<String, String>>,
    ttl: Option<chrono::Duration>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory cache whose entries expire after `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).ok(),
            ..Self::default()
        }
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let (value, written) = entries.get(&(namespace.to_string(), key.to_string()))?;

        if let Some(ttl) = self.ttl {
            if Utc::now() - *written > ttl {
                return None;
            }
        }

        Some(value.clone())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(
            (namespace.to_string(), key.to_string()),
            (value.to_string(), Utc::now()),
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .clear();
        Ok(())
    }
}

impl SecretStore for MemoryCache {
    fn secret(&self, name: &str) -> Option<String> {
        self.secrets.read().ok()?.get(name).cloned()
    }

    fn store_secret(&self, name: &str, value: &str) -> Result<(), CacheError> {
        self.secrets
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
