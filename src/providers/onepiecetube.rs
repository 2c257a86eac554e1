//! OnePiece-Tube (`onepiece-tube.com`)
//!
//! The site serves a single manga. Chapter lists and page lists are embedded in every
//! page as `<script>window.__data = {...};</script>`, HTML-escaped.

use crate::cache::{CacheBackend, EntityCache};
use crate::crawler::{reverse_chapters, Fetcher};
use crate::model::{Chapter, Manga, Metadata, Page};
use crate::providers::Provider;
use crate::url::{extension_of, resolve_link};
use crate::{Result, TankobonError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::REFERER;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use url::Url;

pub const NAME: &str = "OnePiece-Tube";

pub const STD_LANG: &str = "de";

pub const MANGA_URL: &str = "https://onepiece-tube.com/kapitel-mangaliste";

const SITE_REFERER: &str = "https://onepiece-tube.com";

static EMBEDDED_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<script>window\.__data = (.*);</script>").unwrap());

#[derive(Debug, Deserialize)]
struct ChapterListData {
    #[serde(default)]
    entries: Vec<ChapterEntry>,
}

#[derive(Debug, Deserialize)]
struct ChapterEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    number: i64,
    #[serde(default)]
    is_available: bool,
    #[serde(default)]
    href: String,
}

#[derive(Debug, Deserialize)]
struct ChapterData {
    #[serde(default)]
    chapter: ChapterPages,
}

#[derive(Debug, Default, Deserialize)]
struct ChapterPages {
    #[serde(default)]
    pages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    url: String,
}

pub struct OnePieceTube {
    fetcher: Fetcher,
    manga_url: String,
    chapters: EntityCache<Chapter>,
}

impl OnePieceTube {
    pub fn new(fetcher: Fetcher, store: Arc<dyn CacheBackend>) -> Self {
        Self::with_manga_url(fetcher, store, MANGA_URL)
    }

    /// Creates the provider with a different chapter list location
    pub fn with_manga_url(fetcher: Fetcher, store: Arc<dyn CacheBackend>, manga_url: &str) -> Self {
        Self {
            fetcher,
            manga_url: manga_url.to_string(),
            chapters: EntityCache::new(store, &provider_id(), "chapters"),
        }
    }

    async fn fetch_page(&self, address: &str) -> Result<String> {
        let request = self.fetcher.client().get(address).header(REFERER, SITE_REFERER);
        let body = self.fetcher.text(address, request).await?;
        Ok(unescape_html(&body))
    }
}

fn provider_id() -> String {
    format!("{} built-in", NAME)
}

#[async_trait]
impl Provider for OnePieceTube {
    fn name(&self) -> &str {
        NAME
    }

    fn id(&self) -> String {
        provider_id()
    }

    fn std_lang(&self) -> &str {
        STD_LANG
    }

    async fn search(&self, _query: &str) -> Result<Vec<Manga>> {
        Ok(vec![Manga {
            id: self.manga_url.clone(),
            name: "One Piece".to_string(),
            url: self.manga_url.clone(),
            index: 0,
            source: provider_id(),
            metadata: Metadata {
                language_iso: STD_LANG.to_string(),
                ..Metadata::default()
            },
        }])
    }

    async fn chapters_of(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let mut chapters = self
            .chapters
            .get_or_fetch(&manga.url, || async {
                let text = self.fetch_page(&manga.url).await?;
                parse_chapter_list(&text, manga).map(reverse_chapters)
            })
            .await?;

        let parent = manga.to_ref();
        for chapter in &mut chapters {
            chapter.manga = parent.clone();
        }

        tracing::info!("{}: {} chapters available", NAME, chapters.len());
        Ok(chapters)
    }

    async fn pages_of(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let text = self.fetch_page(&chapter.url).await?;
        let pages = parse_page_list(&text, chapter)?;
        tracing::info!("{}: {} pages of '{}'", NAME, pages.len(), chapter.name);
        Ok(pages)
    }
}

fn embedded_data(text: &str) -> Option<&str> {
    EMBEDDED_DATA
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|data| data.as_str())
}

fn decode_error(operation: &'static str, e: serde_json::Error) -> TankobonError {
    TankobonError::Decode {
        provider: NAME.to_string(),
        operation,
        message: e.to_string(),
    }
}

/// Extracts the available chapters, in site order, from an unescaped chapter list page
fn parse_chapter_list(text: &str, manga: &Manga) -> Result<Vec<Chapter>> {
    let Some(data) = embedded_data(text) else {
        tracing::debug!("No embedded data on {}", manga.url);
        return Ok(Vec::new());
    };

    let list: ChapterListData =
        serde_json::from_str(data).map_err(|e| decode_error("chapters", e))?;
    let base = Url::parse(&manga.url).ok();
    let parent = manga.to_ref();

    Ok(list
        .entries
        .into_iter()
        .filter(|entry| entry.is_available)
        .map(|entry| {
            let url = base
                .as_ref()
                .and_then(|base| resolve_link(&entry.href, base))
                .unwrap_or_else(|| entry.href.clone());

            Chapter {
                name: entry.name.trim().to_string(),
                id: base_name(&entry.href).to_string(),
                url,
                index: u16::try_from(entry.number).unwrap_or(0),
                number: entry.number.to_string(),
                volume: String::new(),
                manga: parent.clone(),
                pages: Vec::new(),
            }
        })
        .collect())
}

/// Extracts the page images from an unescaped chapter page
fn parse_page_list(text: &str, chapter: &Chapter) -> Result<Vec<Page>> {
    let Some(data) = embedded_data(text) else {
        tracing::debug!("No embedded data on {}", chapter.url);
        return Ok(Vec::new());
    };

    let data: ChapterData = serde_json::from_str(data).map_err(|e| decode_error("pages", e))?;
    let parent = chapter.to_ref();

    Ok(data
        .chapter
        .pages
        .into_iter()
        .enumerate()
        .map(|(position, page)| Page {
            extension: extension_of(&page.url),
            url: page.url,
            index: u16::try_from(position).unwrap_or(u16::MAX),
            chapter: parent.clone(),
            key: None,
            size: 0,
        })
        .collect())
}

fn base_name(href: &str) -> &str {
    let trimmed = href.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Replaces HTML character references with the characters they name
///
/// Covers numeric references and the HTML5 named entity table. Unknown names are left
/// as they are.
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
