//! SQLite cache store
//!
//! Entries survive process restarts and are only removed by [`CacheBackend::clear`]
//! or by deleting the database file.

use crate::cache::schema::initialize_schema;
use crate::cache::{CacheBackend, CacheError, SecretStore};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite cache backend
pub struct SqliteCache {
    conn: Mutex<Connection>,
    ttl: Option<chrono::Duration>,
}

impl SqliteCache {
    /// Opens or creates the cache database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `ttl` - Entries older than this read as misses; `None` keeps them forever
    pub fn new(path: &Path, ttl: Option<Duration>) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self::from_connection(conn, ttl))
    }

    /// Creates an in-memory database
    pub fn new_in_memory(ttl: Option<Duration>) -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self::from_connection(conn, ttl))
    }

    fn from_connection(conn: Connection, ttl: Option<Duration>) -> Self {
        Self {
            conn: Mutex::new(conn),
            ttl: ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok()),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }

    fn is_fresh(&self, updated_at: &str) -> bool {
        let Some(ttl) = self.ttl else {
            return true;
        };

        match DateTime::parse_from_rfc3339(updated_at) {
            Ok(written) => Utc::now() - written.with_timezone(&Utc) <= ttl,
            Err(_) => false,
        }
    }

    fn lookup(&self, namespace: &str, key: &str) -> Result<Option<(String, String)>, CacheError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT value, updated_at FROM cache_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row)
    }
}

impl CacheBackend for SqliteCache {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        match self.lookup(namespace, key) {
            Ok(Some((value, updated_at))) if self.is_fresh(&updated_at) => Some(value),
            Ok(Some(_)) => {
                tracing::debug!("Cache entry {}/{} is stale", namespace, key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Cache read failed for {}/{}: {}", namespace, key, e);
                None
            }
        }
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), CacheError> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT OR REPLACE INTO cache_entries (namespace, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![namespace, key, value, now],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.conn()?.execute("DELETE FROM cache_entries", [])?;
        Ok(())
    }
}

impl SecretStore for SqliteCache {
    fn secret(&self, name: &str) -> Option<String> {
        let conn = self.conn().ok()?;
        conn.query_row(
            "SELECT value FROM secrets WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            tracing::debug!("Secret read failed for {}: {}", name, e);
            None
        })
    }

    fn store_secret(&self, name: &str, value: &str) -> Result<(), CacheError> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT OR REPLACE INTO secrets (name, value, updated_at) VALUES (?1, ?2, ?3)",
            params![name, value, now],
        )?;
        Ok(())
    }
}
