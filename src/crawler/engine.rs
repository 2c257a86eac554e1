//! Generic crawl engine
//!
//! [`GenericProvider`] implements [`Provider`] for any HTML site described by a
//! [`SiteConfig`]. Each operation:
//!
//! 1. derives a cache key from the target URL via [`cache_key`]
//! 2. on a hit, returns the cached list re-attached to the requesting parent
//! 3. on a miss, fetches the document within the site's [`Throttle`] budget, applies
//!    the matching extractor, reverses chapters when the site lists them newest first,
//!    and stores the result
//!
//! Documents are parsed and dropped inside synchronous helpers so no parsed tree is
//! held across an await point.

use crate::cache::{CacheBackend, EntityCache};
use crate::crawler::{Fetcher, SiteConfig, Throttle};
use crate::model::{Chapter, Manga, Metadata, Page};
use crate::providers::Provider;
use crate::ruleset::{Field, Record};
use crate::url::{cache_key, extension_of, resolve_link};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// A provider driven entirely by a [`SiteConfig`]
pub struct GenericProvider {
    site: SiteConfig,
    id: String,
    fetcher: Fetcher,
    throttle: Throttle,
    mangas: EntityCache<Manga>,
    chapters: EntityCache<Chapter>,
    pages: EntityCache<Page>,
}

impl GenericProvider {
    /// Creates a provider for `site`
    ///
    /// # Arguments
    ///
    /// * `site` - The site description
    /// * `fetcher` - Shared HTTP fetcher
    /// * `store` - Backend for the provider's mangas, chapters and pages caches
    pub fn new(site: SiteConfig, fetcher: Fetcher, store: Arc<dyn CacheBackend>) -> Self {
        let id = site.id();
        let throttle = Throttle::new(site.parallelism, site.delay);

        Self {
            mangas: EntityCache::new(store.clone(), &id, "mangas"),
            chapters: EntityCache::new(store.clone(), &id, "chapters"),
            pages: EntityCache::new(store, &id, "pages"),
            site,
            id,
            fetcher,
            throttle,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    async fn fetch_document(&self, address: &str) -> Result<(String, Url)> {
        let document_url = Url::parse(address)?;
        let _permit = self.throttle.acquire().await?;
        let body = self.fetcher.get_text(address).await?;
        Ok((body, document_url))
    }
}

#[async_trait]
impl Provider for GenericProvider {
    fn name(&self) -> &str {
        &self.site.name
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn std_lang(&self) -> &str {
        &self.site.std_lang
    }

    async fn search(&self, query: &str) -> Result<Vec<Manga>> {
        let address = self.site.search_url_for(query);
        let key = cache_key(&address);

        let mut mangas = self
            .mangas
            .get_or_fetch(&key, || async {
                let (body, document_url) = self.fetch_document(&address).await?;
                Ok(parse_mangas(&self.site, &body, &document_url))
            })
            .await?;

        for manga in &mut mangas {
            manga.source = self.id.clone();
        }

        tracing::info!("{}: {} results for '{}'", self.site.name, mangas.len(), query);
        Ok(mangas)
    }

    async fn chapters_of(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let key = cache_key(&manga.url);

        let mut chapters = self
            .chapters
            .get_or_fetch(&key, || async {
                let (body, document_url) = self.fetch_document(&manga.url).await?;
                let chapters = parse_chapters(&self.site, &body, &document_url, manga);
                if self.site.reverse_chapters {
                    Ok(reverse_chapters(chapters))
                } else {
                    Ok(chapters)
                }
            })
            .await?;

        let parent = manga.to_ref();
        for chapter in &mut chapters {
            chapter.manga = parent.clone();
        }

        tracing::info!("{}: {} chapters of '{}'", self.site.name, chapters.len(), manga.name);
        Ok(chapters)
    }

    async fn pages_of(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let key = cache_key(&chapter.url);

        let mut pages = self
            .pages
            .get_or_fetch(&key, || async {
                let (body, document_url) = self.fetch_document(&chapter.url).await?;
                Ok(parse_pages(&self.site, &body, &document_url, chapter))
            })
            .await?;

        let parent = chapter.to_ref();
        for page in &mut pages {
            page.chapter = parent.clone();
        }

        tracing::info!("{}: {} pages of '{}'", self.site.name, pages.len(), chapter.name);
        Ok(pages)
    }
}

/// Reverses a newest-first chapter list into reading order
///
/// The chapter originally at position `i` of `n` moves to position `n - 1 - i` and
/// gets the 1-based index `n - i`.
pub fn reverse_chapters(mut chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters.reverse();
    for (position, chapter) in chapters.iter_mut().enumerate() {
        chapter.index = to_index(position + 1);
    }
    chapters
}

/// Extracts catalog items from a search result page
pub fn parse_mangas(site: &SiteConfig, html: &str, document_url: &Url) -> Vec<Manga> {
    let source = site.id();

    located(site.manga_extractor.extract_html(html), document_url)
        .enumerate()
        .map(|(position, (record, url))| {
            let language = match record.get(Field::Language).trim() {
                "" => site.std_lang.clone(),
                language => language.to_string(),
            };

            Manga {
                id: id_or_url(&record, &url),
                name: record.get(Field::Name).trim().to_string(),
                url,
                index: to_index(position),
                source: source.clone(),
                metadata: Metadata {
                    language_iso: language,
                    cover: resolve_link(record.get(Field::Cover), document_url).unwrap_or_default(),
                    ..Metadata::default()
                },
            }
        })
        .collect()
}

/// Extracts chapters from a manga page in document order
pub fn parse_chapters(
    site: &SiteConfig,
    html: &str,
    document_url: &Url,
    manga: &Manga,
) -> Vec<Chapter> {
    let parent = manga.to_ref();

    located(site.chapter_extractor.extract_html(html), document_url)
        .enumerate()
        .map(|(position, (record, url))| Chapter {
            name: record.get(Field::Name).trim().to_string(),
            id: id_or_url(&record, &url),
            url,
            index: to_index(position),
            number: record.get(Field::Number).trim().to_string(),
            volume: record.get(Field::Volume).trim().to_string(),
            manga: parent.clone(),
            pages: Vec::new(),
        })
        .collect()
}

/// Extracts page images from a chapter page in document order
pub fn parse_pages(site: &SiteConfig, html: &str, document_url: &Url, chapter: &Chapter) -> Vec<Page> {
    let parent = chapter.to_ref();

    located(site.page_extractor.extract_html(html), document_url)
        .enumerate()
        .map(|(position, (_, url))| Page {
            extension: extension_of(&url),
            url,
            index: to_index(position),
            chapter: parent.clone(),
            key: None,
            size: 0,
        })
        .collect()
}

/// Pairs each record with its absolute URL, dropping records without one
fn located<'a>(
    records: Vec<Record>,
    document_url: &'a Url,
) -> impl Iterator<Item = (Record, String)> + 'a {
    records.into_iter().filter_map(move |record| {
        match resolve_link(record.get(Field::Url), document_url) {
            Some(url) => Some((record, url)),
            None => {
                tracing::debug!("Skipping record without a usable URL on {}", document_url);
                None
            }
        }
    })
}

fn id_or_url(record: &Record, url: &str) -> String {
    match record.get(Field::Id).trim() {
        "" => url.to_string(),
        id => id.to_string(),
    }
}

fn to_index(position: usize) -> u16 {
    u16::try_from(position).unwrap_or(u16::MAX)
}
