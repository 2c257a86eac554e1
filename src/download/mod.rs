//! Page downloader
//!
//! Downloads the page images of a chapter either concurrently (one task per page,
//! bounded by a semaphore) or one after another. The first failure wins: once a page
//! fails no further page starts, pages already in flight are allowed to finish, and a
//! single [`DownloadError`] naming the failing page is returned. Only completed pages
//! contribute to the chapter size.

mod decrypt;

pub use decrypt::{decrypt_image, xor_with_key};

use crate::config::DownloaderConfig;
use crate::crawler::Fetcher;
use crate::model::{Chapter, Page};
use crate::{Result, TankobonError};
use reqwest::header::REFERER;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// How the pages of one chapter are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// One task per page, at most `max_in_flight` downloading at once
    Concurrent { max_in_flight: usize },

    /// Pages in index order, one at a time
    Sequential,
}

impl DownloadMode {
    pub fn from_config(config: &DownloaderConfig) -> Self {
        if config.concurrent {
            Self::Concurrent {
                max_in_flight: config.max_concurrent.max(1),
            }
        } else {
            Self::Sequential
        }
    }
}

/// Downloaded bytes of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub index: u16,
    pub extension: String,
    pub data: Vec<u8>,
}

/// Result of a fully successful chapter download
#[derive(Debug, Clone, Default)]
pub struct ChapterDownload {
    /// Page contents in index order
    pub pages: Vec<PageContent>,

    /// Total downloaded bytes
    pub size: u64,
}

/// The single error reported for a failed chapter download
#[derive(Debug, Error)]
#[error("page {page_index} ({url}) failed with {completed_bytes} bytes downloaded: {source}")]
pub struct DownloadError {
    /// Index of the page that failed first
    pub page_index: u16,

    pub url: String,

    /// Bytes of the pages that completed before the barrier
    pub completed_bytes: u64,

    #[source]
    pub source: Box<TankobonError>,
}

enum PageOutcome {
    Done(Vec<u8>),
    Skipped,
    Failed { first: bool, error: TankobonError },
}

/// Downloads a single page, decrypting it when the page carries a key
///
/// The request carries the chapter URL as `Referer`.
pub async fn download_page(fetcher: &Fetcher, page: &Page) -> Result<Vec<u8>> {
    let request = fetcher
        .client()
        .get(&page.url)
        .header(REFERER, page.chapter.url.as_str());
    let mut data = fetcher.bytes(&page.url, request).await?;

    if let Some(key) = page.key.as_deref().filter(|key| !key.is_empty()) {
        decrypt_image(&mut data, key)?;
    }

    Ok(data)
}

/// Downloads every page of `chapter`
///
/// On success each page's `size` is set and the contents are returned in index order.
/// On failure the pages that completed still have their `size` set. Sizes left from an
/// earlier attempt on the same chapter are reset first.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP fetcher
/// * `chapter` - Chapter whose `pages` are already listed
/// * `mode` - Concurrent or sequential fetching
pub async fn download_chapter(
    fetcher: &Fetcher,
    chapter: &mut Chapter,
    mode: DownloadMode,
) -> std::result::Result<ChapterDownload, DownloadError> {
    tracing::debug!(
        "Downloading {} pages of chapter '{}'",
        chapter.pages.len(),
        chapter.name
    );

    // Sizes only ever describe the current attempt
    for page in &mut chapter.pages {
        page.size = 0;
    }

    let outcomes = match mode {
        DownloadMode::Sequential => download_sequential(fetcher, &chapter.pages).await,
        DownloadMode::Concurrent { max_in_flight } => {
            download_concurrent(fetcher, &chapter.pages, max_in_flight).await
        }
    };

    let mut contents = Vec::new();
    let mut first_failure: Option<(usize, TankobonError)> = None;
    let mut other_failure: Option<(usize, TankobonError)> = None;

    for (position, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            PageOutcome::Done(data) => {
                let page = &mut chapter.pages[position];
                page.size = data.len() as u64;
                contents.push(PageContent {
                    index: page.index,
                    extension: page.extension.clone(),
                    data,
                });
            }
            PageOutcome::Skipped => {}
            PageOutcome::Failed { first: true, error } => first_failure = Some((position, error)),
            PageOutcome::Failed { first: false, error } => {
                if other_failure.is_none() {
                    other_failure = Some((position, error));
                }
            }
        }
    }

    let size = chapter.size();

    if let Some((position, error)) = first_failure.or(other_failure) {
        let page = &chapter.pages[position];
        tracing::error!("Chapter '{}' failed at page {}: {}", chapter.name, page.index, error);
        return Err(DownloadError {
            page_index: page.index,
            url: page.url.clone(),
            completed_bytes: size,
            source: Box::new(error),
        });
    }

    tracing::info!(
        "Downloaded {} pages ({} bytes) of chapter '{}'",
        contents.len(),
        size,
        chapter.name
    );

    Ok(ChapterDownload {
        pages: contents,
        size,
    })
}

async fn download_sequential(fetcher: &Fetcher, pages: &[Page]) -> Vec<PageOutcome> {
    let mut outcomes = Vec::with_capacity(pages.len());
    let mut failed = false;

    for page in pages {
        if failed {
            outcomes.push(PageOutcome::Skipped);
            continue;
        }

        match download_page(fetcher, page).await {
            Ok(data) => outcomes.push(PageOutcome::Done(data)),
            Err(error) => {
                failed = true;
                outcomes.push(PageOutcome::Failed { first: true, error });
            }
        }
    }

    outcomes
}

async fn download_concurrent(
    fetcher: &Fetcher,
    pages: &[Page],
    max_in_flight: usize,
) -> Vec<PageOutcome> {
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let failed = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = pages
        .iter()
        .map(|page| {
            let fetcher = fetcher.clone();
            let page = page.clone();
            let semaphore = semaphore.clone();
            let failed = failed.clone();

            tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return PageOutcome::Failed {
                            first: !failed.swap(true, Ordering::SeqCst),
                            error: TankobonError::Task(e.to_string()),
                        }
                    }
                };

                if failed.load(Ordering::SeqCst) {
                    return PageOutcome::Skipped;
                }

                match download_page(&fetcher, &page).await {
                    Ok(data) => PageOutcome::Done(data),
                    Err(error) => PageOutcome::Failed {
                        first: !failed.swap(true, Ordering::SeqCst),
                        error,
                    },
                }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(match handle.await {
            Ok(outcome) => outcome,
            Err(e) => PageOutcome::Failed {
                first: !failed.swap(true, Ordering::SeqCst),
                error: TankobonError::Task(e.to_string()),
            },
        });
    }

    outcomes
}

/// Writes downloaded pages into `dir` as `{index:04}{extension}`
///
/// Creates `dir` when missing and returns the written paths in page order.
pub async fn save_pages(download: &ChapterDownload, dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(download.pages.len());
    for page in &download.pages {
        let path = dir.join(format!("{:04}{}", page.index, page.extension));
        tokio::fs::write(&path, &page.data).await?;
        written.push(path);
    }

    Ok(written)
}
