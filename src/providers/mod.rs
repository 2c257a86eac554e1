//! Built-in providers
//!
//! A [`Provider`] answers three questions: which catalog items match a query, which
//! chapters a manga has, and which pages a chapter has. The built-in set is:
//! - three generic HTML sites driven by [`crate::crawler::GenericProvider`]
//! - OnePiece-Tube, whose data is embedded as JSON in its pages
//! - MangaPlus, a protobuf API with web and app surfaces

mod common;
pub mod manganato;
pub mod manganelo;
pub mod mangapill;
pub mod mangaplus;
pub mod onepiecetube;

pub use mangaplus::MangaPlus;
pub use onepiecetube::OnePieceTube;

use crate::cache::{
    CacheBackend, CacheError, DisabledCache, MemoryCache, SecretStore, SqliteCache,
};
use crate::config::{CacheConfig, Config};
use crate::crawler::{Fetcher, GenericProvider};
use crate::model::{Chapter, Manga, Page};
use crate::{Result, TankobonError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A source of mangas, chapters and pages
#[async_trait]
pub trait Provider: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Stable identifier, `"{name} built-in"` for built-in providers
    fn id(&self) -> String;

    /// Language of the provider's content when an item carries none
    fn std_lang(&self) -> &str;

    /// Searches the catalog
    async fn search(&self, query: &str) -> Result<Vec<Manga>>;

    /// Lists the chapters of `manga` in reading order
    async fn chapters_of(&self, manga: &Manga) -> Result<Vec<Chapter>>;

    /// Lists the pages of `chapter` in reading order
    async fn pages_of(&self, chapter: &Chapter) -> Result<Vec<Page>>;
}

/// Cache and secret stores shared by the built-in providers
#[derive(Clone)]
pub struct Stores {
    /// Backend for providers whose results are persisted across runs
    pub persistent: Arc<dyn CacheBackend>,

    /// Backend for the generic HTML providers
    pub generic: Arc<dyn CacheBackend>,

    pub secrets: Arc<dyn SecretStore>,
}

impl Stores {
    /// Opens the stores described by the cache configuration
    ///
    /// A database that cannot be opened degrades to process-local storage.
    pub fn open(config: &CacheConfig) -> Self {
        let ttl = config
            .ttl_hours
            .map(|hours| Duration::from_secs(hours.saturating_mul(3600)));

        let database = match SqliteCache::new(Path::new(&config.path), ttl) {
            Ok(database) => Some(Arc::new(database)),
            Err(e) => {
                tracing::warn!("Cache database {} unavailable: {}", config.path, e);
                None
            }
        };

        let (durable, secrets) = match database {
            Some(database) => shared(database),
            None => shared(Arc::new(memory_cache(ttl))),
        };

        if !config.enabled {
            return Self {
                persistent: Arc::new(DisabledCache),
                generic: Arc::new(DisabledCache),
                secrets,
            };
        }

        let generic: Arc<dyn CacheBackend> = if config.persist_generic {
            durable.clone()
        } else {
            Arc::new(memory_cache(ttl))
        };

        Self {
            persistent: durable,
            generic,
            secrets,
        }
    }

    /// Process-local stores
    pub fn in_memory() -> Self {
        let memory = Arc::new(MemoryCache::new());
        Self {
            persistent: memory.clone(),
            generic: Arc::new(MemoryCache::new()),
            secrets: memory,
        }
    }

    /// Removes every cached entry; secrets are kept
    pub fn clear(&self) -> std::result::Result<(), CacheError> {
        self.persistent.clear()?;
        self.generic.clear()
    }
}

fn shared<S>(store: Arc<S>) -> (Arc<dyn CacheBackend>, Arc<dyn SecretStore>)
where
    S: CacheBackend + SecretStore + 'static,
{
    (store.clone(), store)
}

fn memory_cache(ttl: Option<Duration>) -> MemoryCache {
    match ttl {
        Some(ttl) => MemoryCache::with_ttl(ttl),
        None => MemoryCache::new(),
    }
}

/// Builds every built-in provider
///
/// # Arguments
///
/// * `config` - Full configuration; the MangaPlus section selects its API surface
/// * `fetcher` - Shared HTTP fetcher
/// * `stores` - Cache and secret stores
pub fn builtin_providers(
    config: &Config,
    fetcher: &Fetcher,
    stores: &Stores,
) -> Result<Vec<Arc<dyn Provider>>> {
    let mut providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(OnePieceTube::new(fetcher.clone(), stores.persistent.clone())),
        Arc::new(MangaPlus::new(
            &config.mangaplus,
            fetcher.clone(),
            stores.persistent.clone(),
            stores.secrets.clone(),
        )),
    ];

    for site in [manganelo::site()?, manganato::site()?, mangapill::site()?] {
        providers.push(Arc::new(GenericProvider::new(
            site,
            fetcher.clone(),
            stores.generic.clone(),
        )));
    }

    Ok(providers)
}

/// Finds a provider by ID or case-insensitive name
pub fn find_provider(providers: &[Arc<dyn Provider>], name: &str) -> Result<Arc<dyn Provider>> {
    providers
        .iter()
        .find(|provider| provider.id() == name || provider.name().eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| TankobonError::UnknownProvider(name.to_string()))
}
