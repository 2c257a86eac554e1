use crate::cache::{CacheBackend, CacheError, KeyLocks};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed cache of entity lists for one provider operation
///
/// Values are stored as JSON under the namespace `"{provider_id}_{kind}"`.
pub struct EntityCache<T> {
    store: Arc<dyn CacheBackend>,
    namespace: String,
    locks: KeyLocks,
    _entity: PhantomData<fn() -> T>,
}

impl<T> EntityCache<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a cache view over `store` for one provider operation
    ///
    /// # Arguments
    ///
    /// * `store` - Backend shared by every cache of the provider
    /// * `provider_id` - ID of the owning provider
    /// * `kind` - Operation kind, e.g. `"mangas"` or `"chapters_app"`
    pub fn new(store: Arc<dyn CacheBackend>, provider_id: &str, kind: &str) -> Self {
        Self {
            store,
            namespace: format!("{}_{}", provider_id, kind),
            locks: KeyLocks::new(),
            _entity: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the cached list for `key`
    ///
    /// Entries that fail to deserialize are treated as misses.
    pub fn get(&self, key: &str) -> Option<Vec<T>> {
        let raw = self.store.get(&self.namespace, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(
                    "Ignoring undecodable cache entry {}/{}: {}",
                    self.namespace,
                    key,
                    e
                );
                None
            }
        }
    }

    /// Stores `value` under `key`, replacing any previous list
    pub fn set(&self, key: &str, value: &[T]) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.namespace, key, &raw)
    }

    /// Returns the cached list for `key`, or runs `fetch` and caches its result
    ///
    /// Concurrent misses for the same key are serialized: the first caller fetches and
    /// every later caller finds the entry it wrote. A failed fetch caches nothing. A
    /// failed cache write is logged and the fetched list is still returned.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> crate::Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<Vec<T>>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!("Cache hit for {}/{}", self.namespace, key);
            return Ok(hit);
        }

        let _guard = self.locks.acquire(key).await;

        if let Some(hit) = self.get(key) {
            tracing::debug!("Cache filled while waiting for {}/{}", self.namespace, key);
            return Ok(hit);
        }

        tracing::debug!("Cache miss for {}/{}", self.namespace, key);
        let fresh = fetch().await?;

        if let Err(e) = self.set(key, &fresh) {
            tracing::warn!("Failed to cache {}/{}: {}", self.namespace, key, e);
        }

        Ok(fresh)
    }
}
