//! Integration tests for the page downloader

use crate::test_fetcher;
use std::time::Duration;
use tankobon::download::{download_chapter, save_pages, xor_with_key, DownloadMode};
use tankobon::model::{Chapter, ChapterRef, MangaRef, Page};
use tankobon::TankobonError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chapter_with_pages(server: &MockServer, routes: &[&str]) -> Chapter {
    let url = format!("{}/chapter/1", server.uri());
    let chapter_ref = ChapterRef {
        id: "1".to_string(),
        name: "Chapter 1".to_string(),
        url: url.clone(),
        index: 1,
    };

    Chapter {
        name: "Chapter 1".to_string(),
        url,
        id: "1".to_string(),
        index: 1,
        number: "1".to_string(),
        volume: String::new(),
        manga: MangaRef::default(),
        pages: routes
            .iter()
            .enumerate()
            .map(|(position, route)| Page {
                url: format!("{}{}", server.uri(), route),
                index: position as u16,
                extension: ".jpg".to_string(),
                chapter: chapter_ref.clone(),
                key: None,
                size: 0,
            })
            .collect(),
    }
}

async fn mount_image(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrent_download_collects_pages_in_order() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/0.jpg", b"zero").await;
    mount_image(&server, "/img/1.jpg", b"one").await;
    mount_image(&server, "/img/2.jpg", b"two!!").await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);
    let download = download_chapter(
        &test_fetcher(),
        &mut chapter,
        DownloadMode::Concurrent { max_in_flight: 2 },
    )
    .await
    .unwrap();

    assert_eq!(download.size, 12);
    assert_eq!(chapter.size(), 12);
    assert_eq!(download.pages.len(), 3);
    assert_eq!(download.pages[0].data, b"zero");
    assert_eq!(download.pages[2].data, b"two!!");
    assert_eq!(chapter.pages[1].size, 3);
}

#[tokio::test]
async fn test_pages_are_requested_with_chapter_referer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/0.jpg"))
        .and(header("referer", format!("{}/chapter/1", server.uri()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg"]);
    let download = download_chapter(&test_fetcher(), &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap();

    assert_eq!(download.size, 2);
}

#[tokio::test]
async fn test_encrypted_pages_are_decrypted() {
    let server = MockServer::start().await;
    let plain = b"\x89PNG image bytes".to_vec();
    let mut encrypted = plain.clone();
    xor_with_key(&mut encrypted, &[0x1f, 0x2e]);
    mount_image(&server, "/img/secret.png", &encrypted).await;

    let mut chapter = chapter_with_pages(&server, &["/img/secret.png"]);
    chapter.pages[0].key = Some("1f2e".to_string());

    let download = download_chapter(&test_fetcher(), &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap();

    assert_eq!(download.pages[0].data, plain);
}

#[tokio::test]
async fn test_invalid_key_fails_the_page() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/0.jpg", b"data").await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg"]);
    chapter.pages[0].key = Some("not hex".to_string());

    let error = download_chapter(&test_fetcher(), &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap_err();

    assert_eq!(error.page_index, 0);
    assert!(matches!(*error.source, TankobonError::InvalidKey(_)));
}

#[tokio::test]
async fn test_concurrent_failure_reports_failing_page() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/0.jpg", b"zero").await;
    Mock::given(method("GET"))
        .and(path("/img/1.jpg"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;
    mount_image(&server, "/img/2.jpg", b"two").await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);
    let error = download_chapter(
        &test_fetcher(),
        &mut chapter,
        DownloadMode::Concurrent { max_in_flight: 8 },
    )
    .await
    .unwrap_err();

    assert_eq!(error.page_index, 1);
    assert_eq!(error.url, format!("{}/img/1.jpg", server.uri()));
    assert_eq!(error.completed_bytes, 7);
    assert!(matches!(
        *error.source,
        TankobonError::Status { status: 404, .. }
    ));
    assert_eq!(chapter.pages[1].size, 0);
}

#[tokio::test]
async fn test_sequential_failure_stops_remaining_pages() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/0.jpg", b"zero").await;
    Mock::given(method("GET"))
        .and(path("/img/1.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/2.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);
    let error = download_chapter(&test_fetcher(), &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap_err();

    assert_eq!(error.page_index, 1);
    assert_eq!(error.completed_bytes, 4);
}

#[tokio::test]
async fn test_downloaded_chapter_is_saved_to_disk() {
    let server = MockServer::start().await;
    mount_image(&server, "/img/0.jpg", b"zero").await;
    mount_image(&server, "/img/1.jpg", b"one").await;

    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg", "/img/1.jpg"]);
    let download = download_chapter(
        &test_fetcher(),
        &mut chapter,
        DownloadMode::Concurrent { max_in_flight: 4 },
    )
    .await
    .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let written = save_pages(&download, &dir.path().join("chapter-1")).await.unwrap();

    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("chapter-1/0000.jpg"));
    assert_eq!(std::fs::read(&written[1]).unwrap(), b"one");
}

#[tokio::test]
async fn test_retried_download_reports_only_its_own_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/0.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zero".to_vec()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/0.jpg"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_image(&server, "/img/1.jpg", b"five!").await;
    Mock::given(method("GET"))
        .and(path("/img/2.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = test_fetcher();
    let mut chapter = chapter_with_pages(&server, &["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);

    let first = download_chapter(&fetcher, &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap_err();
    assert_eq!(first.page_index, 2);
    assert_eq!(first.completed_bytes, 9);

    let second = download_chapter(&fetcher, &mut chapter, DownloadMode::Sequential)
        .await
        .unwrap_err();
    assert_eq!(second.page_index, 0);
    assert_eq!(second.completed_bytes, 0);
    assert_eq!(chapter.size(), 0);
}
