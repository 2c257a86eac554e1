//! MangaPlus (`mangaplus.shueisha.co.jp`)
//!
//! Talks to the protobuf API behind the official reader. The web surface is anonymous;
//! the app surface needs a secret, which is registered on first use and kept in the
//! secret store. Searches take a numeric title ID and return exactly one manga.
//! Web chapter lists take the first and last chapters of every group; the middle of a
//! group is locked on the web reader and left out. Chapter numbers are reconciled from
//! the raw `#12` / `#ex` style titles. Page images are XOR-encrypted with the hex key
//! carried by each page.

pub mod proto;
mod surface;

pub use surface::{
    ApiSurface, AppApi, DeviceRegistration, APP_API_URL, APP_USER_AGENT, SECRET_NAME,
    WEB_API_URL,
};

use crate::cache::{CacheBackend, EntityCache, SecretStore};
use crate::config::MangaPlusConfig;
use crate::crawler::Fetcher;
use crate::model::{Chapter, Manga, Metadata, Page};
use crate::numbering::ChapterNumberer;
use crate::providers::Provider;
use crate::url::extension_of;
use crate::{Result, TankobonError};
use async_trait::async_trait;
use prost::Message;
use proto::{app, web, Language};
use regex::Regex;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::RequestBuilder;
use std::sync::{Arc, LazyLock};

pub const NAME: &str = "MangaPlus";

pub const STD_LANG: &str = "en";

const TITLE_URL: &str = "https://mangaplus.shueisha.co.jp/titles/";

const VIEWER_URL: &str = "https://mangaplus.shueisha.co.jp/viewer/";

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Title details common to both surfaces
#[derive(Debug, Clone, PartialEq)]
struct TitleDetails {
    title_id: u32,
    name: String,
    language: i32,
    chapters: Vec<RawChapter>,
}

#[derive(Debug, Clone, PartialEq)]
struct RawChapter {
    chapter_id: u32,
    title: String,
    subtitle: String,
}

#[derive(Debug, Clone, PartialEq)]
struct RawPage {
    image_url: String,
    encryption_key: String,
}

pub struct MangaPlus {
    fetcher: Fetcher,
    surface: ApiSurface,
    mangas: EntityCache<Manga>,
    chapters: EntityCache<Chapter>,
}

impl MangaPlus {
    pub fn new(
        config: &MangaPlusConfig,
        fetcher: Fetcher,
        store: Arc<dyn CacheBackend>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self::with_endpoints(config, fetcher, store, secrets, WEB_API_URL, APP_API_URL)
    }

    /// Creates the provider against explicit API base URLs
    pub fn with_endpoints(
        config: &MangaPlusConfig,
        fetcher: Fetcher,
        store: Arc<dyn CacheBackend>,
        secrets: Arc<dyn SecretStore>,
        web_url: &str,
        app_url: &str,
    ) -> Self {
        let surface = ApiSurface::from_config(config, secrets, web_url, app_url);
        let id = provider_id();

        Self {
            mangas: EntityCache::new(store.clone(), &id, &format!("mangas_{}", surface.kind())),
            chapters: EntityCache::new(store, &id, &format!("chapters_{}", surface.kind())),
            fetcher,
            surface,
        }
    }

    pub fn surface(&self) -> &ApiSurface {
        &self.surface
    }

    async fn title_details(&self, title_id: &str) -> Result<TitleDetails> {
        match &self.surface {
            ApiSurface::Web { base_url } => {
                let url = format!("{}/title_detail", base_url);
                let request = self
                    .fetcher
                    .client()
                    .get(&url)
                    .query(&[("title_id", title_id.trim())]);
                let success = self.call_web(&url, request, "title details").await?;
                let view = success
                    .title_detail_view
                    .ok_or_else(|| missing("title details", "title detail view"))?;
                web_title_details(view)
            }
            ApiSurface::App(app) => {
                let secret = self.app_secret(app).await?;
                let url = format!("{}/title_detailV2", app.base_url);
                let request = app_request(self.fetcher.client().get(&url))
                    .query(&app.identity())
                    .query(&[("secret", secret.as_str()), ("title_id", title_id.trim())]);
                let success = self.call_app(&url, request, "title details").await?;
                let view = success
                    .title_detail_view
                    .ok_or_else(|| missing("title details", "title detail view"))?;
                app_title_details(view)
            }
        }
    }

    async fn viewer(&self, chapter_id: &str) -> Result<Vec<RawPage>> {
        let viewer_params = [
            ("chapter_id", chapter_id.trim()),
            ("split", "no"),
            ("img_quality", "super_high"),
        ];

        match &self.surface {
            ApiSurface::Web { base_url } => {
                let url = format!("{}/manga_viewer", base_url);
                let request = self.fetcher.client().get(&url).query(&viewer_params);
                let success = self.call_web(&url, request, "pages").await?;
                let viewer = success
                    .manga_viewer
                    .ok_or_else(|| missing("pages", "manga viewer"))?;

                Ok(viewer
                    .pages
                    .into_iter()
                    .filter_map(|page| page.manga_page)
                    .filter(|page| !page.image_url.is_empty())
                    .map(|page| RawPage {
                        image_url: page.image_url,
                        encryption_key: page.encryption_key,
                    })
                    .collect())
            }
            ApiSurface::App(app) => {
                let secret = self.app_secret(app).await?;
                let url = format!("{}/manga_viewer", app.base_url);
                let request = app_request(self.fetcher.client().get(&url))
                    .query(&app.identity())
                    .query(&[("secret", secret.as_str())])
                    .query(&viewer_params);
                let success = self.call_app(&url, request, "pages").await?;
                let viewer = success
                    .manga_viewer
                    .ok_or_else(|| missing("pages", "manga viewer"))?;

                Ok(viewer
                    .pages
                    .into_iter()
                    .filter_map(|page| page.page)
                    .filter(|page| !page.image_page.is_empty())
                    .map(|page| RawPage {
                        image_url: page.image_page,
                        encryption_key: page.encryption_key,
                    })
                    .collect())
            }
        }
    }

    /// Returns the app secret, registering a new device when none is known
    async fn app_secret(&self, app: &AppApi) -> Result<String> {
        let mut secret = app.secret.lock().await;
        if let Some(secret) = secret.as_ref() {
            return Ok(secret.clone());
        }

        if let Some(stored) = app.secrets.secret(SECRET_NAME) {
            *secret = Some(stored.clone());
            return Ok(stored);
        }

        let registered = self.register(app).await?;
        if let Err(e) = app.secrets.store_secret(SECRET_NAME, &registered) {
            tracing::warn!("{}: failed to persist app secret: {}", NAME, e);
        }

        *secret = Some(registered.clone());
        Ok(registered)
    }

    async fn register(&self, app: &AppApi) -> Result<String> {
        tracing::info!("{}: registering a new app device", NAME);

        let registration = DeviceRegistration::generate();
        let url = format!("{}/register", app.base_url);
        let request = app_request(self.fetcher.client().put(&url))
            .query(&app.identity())
            .query(&[
                ("device_token", registration.device_token.as_str()),
                ("security_key", registration.security_key.as_str()),
            ]);

        let success = self.call_app(&url, request, "registration").await?;
        let secret = success
            .register_view
            .map(|view| view.secret)
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| missing("registration", "secret"))?;

        Ok(secret)
    }

    async fn call_web(
        &self,
        url: &str,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<web::SuccessResult> {
        let body = self.fetcher.bytes(url, request).await?;
        let response = web::Response::decode(body.as_slice())
            .map_err(|e| decode_error(operation, e.to_string()))?;

        match (response.success, response.error) {
            (Some(success), _) => Ok(success),
            (None, Some(error)) => Err(api_error(operation, web_error_code(&error))),
            (None, None) => Err(unsuccessful(operation)),
        }
    }

    async fn call_app(
        &self,
        url: &str,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<app::SuccessResult> {
        let body = self.fetcher.bytes(url, request).await?;
        let response = app::Response::decode(body.as_slice())
            .map_err(|e| decode_error(operation, e.to_string()))?;

        match (response.success, response.error) {
            (Some(success), _) => Ok(success),
            (None, Some(error)) => Err(api_error(operation, app_error_code(&error))),
            (None, None) => Err(unsuccessful(operation)),
        }
    }
}

#[async_trait]
impl Provider for MangaPlus {
    fn name(&self) -> &str {
        NAME
    }

    fn id(&self) -> String {
        provider_id()
    }

    fn std_lang(&self) -> &str {
        STD_LANG
    }

    async fn search(&self, query: &str) -> Result<Vec<Manga>> {
        let title_id = query.trim();
        if title_id.is_empty() {
            return Ok(Vec::new());
        }

        let mut mangas = self
            .mangas
            .get_or_fetch(title_id, || async {
                let details = self.title_details(title_id).await?;
                Ok(vec![manga_from_details(&details)])
            })
            .await?;

        for manga in &mut mangas {
            manga.source = provider_id();
        }

        Ok(mangas)
    }

    async fn chapters_of(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let mut chapters = self
            .chapters
            .get_or_fetch(&manga.id, || async {
                let details = self.title_details(&manga.id).await?;
                Ok(number_chapters(&details.chapters, manga))
            })
            .await?;

        let parent = manga.to_ref();
        for chapter in &mut chapters {
            chapter.manga = parent.clone();
        }

        tracing::info!("{}: {} chapters of '{}'", NAME, chapters.len(), manga.name);
        Ok(chapters)
    }

    async fn pages_of(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let parent = chapter.to_ref();
        let pages: Vec<Page> = self
            .viewer(&chapter.id)
            .await?
            .into_iter()
            .enumerate()
            .map(|(position, page)| Page {
                extension: extension_of(&page.image_url),
                url: page.image_url,
                index: u16::try_from(position).unwrap_or(u16::MAX),
                chapter: parent.clone(),
                key: Some(page.encryption_key).filter(|key| !key.is_empty()),
                size: 0,
            })
            .collect();

        tracing::info!("{}: {} pages of '{}'", NAME, pages.len(), chapter.name);
        Ok(pages)
    }
}

fn provider_id() -> String {
    format!("{} built-in", NAME)
}

fn app_request(request: RequestBuilder) -> RequestBuilder {
    request
        .header(ACCEPT, "*/*")
        .header(USER_AGENT, APP_USER_AGENT)
}

fn decode_error(operation: &'static str, message: String) -> TankobonError {
    TankobonError::Decode {
        provider: NAME.to_string(),
        operation,
        message,
    }
}

fn missing(operation: &'static str, what: &str) -> TankobonError {
    decode_error(operation, format!("response carries no {}", what))
}

fn api_error(operation: &'static str, code: String) -> TankobonError {
    TankobonError::Api {
        provider: NAME.to_string(),
        operation,
        code,
    }
}

fn unsuccessful(operation: &'static str) -> TankobonError {
    TankobonError::UnsuccessfulRequest {
        provider: NAME.to_string(),
        operation,
    }
}

fn web_error_code(error: &web::ErrorResult) -> String {
    match &error.english_popup {
        Some(popup) if !popup.subject.is_empty() => popup.subject.clone(),
        _ => error.action.to_string(),
    }
}

fn app_error_code(error: &app::ErrorResult) -> String {
    match &error.default {
        Some(popup) if !popup.code.is_empty() => popup.code.clone(),
        Some(popup) if !popup.subject.is_empty() => popup.subject.clone(),
        _ => error.action.to_string(),
    }
}

fn web_title_details(view: web::TitleDetailView) -> Result<TitleDetails> {
    let title = view
        .title
        .ok_or_else(|| missing("title details", "title"))?;

    let listed: Vec<web::Chapter> = if view.chapter_list_group.is_empty() {
        view.first_chapter_list
            .into_iter()
            .chain(view.last_chapter_list)
            .collect()
    } else {
        // Mid lists hold chapters the web reader keeps locked
        view.chapter_list_group
            .into_iter()
            .flat_map(|group| {
                group
                    .first_chapter_list
                    .into_iter()
                    .chain(group.last_chapter_list)
            })
            .collect()
    };

    Ok(TitleDetails {
        title_id: title.title_id,
        name: title.name,
        language: title.language,
        chapters: listed
            .into_iter()
            .map(|chapter| RawChapter {
                chapter_id: chapter.chapter_id,
                title: chapter.name,
                subtitle: chapter.sub_title,
            })
            .collect(),
    })
}

fn app_title_details(view: app::TitleDetailView) -> Result<TitleDetails> {
    let title = view
        .title
        .ok_or_else(|| missing("title details", "title"))?;

    let chapters = view
        .chapters
        .into_iter()
        .flat_map(|group| {
            group
                .first_chapter_list
                .into_iter()
                .chain(group.chapter_list)
                .chain(group.last_chapter_list)
        })
        .map(|chapter| RawChapter {
            chapter_id: chapter.chapter_id,
            title: chapter.title_name,
            subtitle: chapter.chapter_sub_title,
        })
        .collect();

    Ok(TitleDetails {
        title_id: title.title_id,
        name: title.title_name,
        language: title.language,
        chapters,
    })
}

fn manga_from_details(details: &TitleDetails) -> Manga {
    let language = Language::try_from(details.language)
        .map(Language::iso_code)
        .unwrap_or(STD_LANG);

    Manga {
        id: details.title_id.to_string(),
        name: escape_name(&details.name),
        url: format!("{}{}", TITLE_URL, details.title_id),
        index: 0,
        source: provider_id(),
        metadata: Metadata {
            language_iso: language.to_string(),
            ..Metadata::default()
        },
    }
}

fn number_chapters(raw: &[RawChapter], manga: &Manga) -> Vec<Chapter> {
    let mut numberer = ChapterNumberer::new();
    let parent = manga.to_ref();

    raw.iter()
        .enumerate()
        .map(|(position, chapter)| Chapter {
            name: chapter.subtitle.clone(),
            url: format!("{}{}", VIEWER_URL, chapter.chapter_id),
            id: chapter.chapter_id.to_string(),
            index: u16::try_from(position).unwrap_or(u16::MAX),
            number: numberer.next(&chapter.title, &chapter.subtitle),
            volume: String::new(),
            manga: parent.clone(),
            pages: Vec::new(),
        })
        .collect()
}

/// Replaces runs of non-word characters with spaces and trims punctuation from the ends
pub fn escape_name(name: &str) -> String {
    let spaced = NON_WORD.replace_all(name, " ");
    spaced
        .trim_matches(|c: char| c.is_ascii_punctuation() || c == ' ')
        .to_string()
}
