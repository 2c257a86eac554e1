//! Entity cache
//!
//! This module memoizes "query → entity list" results per provider and operation:
//! - [`CacheBackend`] stores raw serialized values by namespace and key
//! - [`EntityCache`] adds typed (de)serialization and per-key miss serialization
//! - [`SqliteCache`] persists across runs, [`MemoryCache`] lives for one process,
//!   [`DisabledCache`] never hits
//!
//! The cache is an optimization only. Reads never fail; an unreadable or corrupt entry
//! is reported as a miss.

mod entity;
mod locks;
mod memory;
mod schema;
mod sqlite;

pub use entity::EntityCache;
pub use locks::KeyLocks;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use thiserror::Error;

/// Errors that can occur while writing to a cache store
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Raw key/value store behind an [`EntityCache`]
///
/// `get` reports every failure as absence. `set` replaces the whole value for a key.
pub trait CacheBackend: Send + Sync {
    /// Looks up the serialized value stored under `(namespace, key)`
    fn get(&self, namespace: &str, key: &str) -> Option<String>;

    /// Stores `value` under `(namespace, key)`, replacing any previous value
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removes every cached entry
    fn clear(&self) -> Result<(), CacheError>;
}

/// Store for long-lived provider credentials
pub trait SecretStore: Send + Sync {
    /// Returns the stored secret called `name`
    fn secret(&self, name: &str) -> Option<String>;

    /// Stores a secret, replacing any previous value
    fn store_secret(&self, name: &str, value: &str) -> Result<(), CacheError>;
}

/// A backend that stores nothing, used when caching is turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

impl CacheBackend for DisabledCache {
    fn get(&self, _namespace: &str, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _namespace: &str, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
