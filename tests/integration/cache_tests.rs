//! Integration tests for persistent provider caching

use crate::test_fetcher;
use prost::Message;
use std::path::Path;
use tankobon::config::{CacheConfig, MangaPlusConfig};
use tankobon::providers::mangaplus::proto::web;
use tankobon::providers::mangaplus::MangaPlus;
use tankobon::providers::{Provider, Stores};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cache_config(path: &Path, enabled: bool) -> CacheConfig {
    CacheConfig {
        enabled,
        path: path.to_string_lossy().into_owned(),
        ..CacheConfig::default()
    }
}

fn title_detail() -> Vec<u8> {
    web::Response {
        success: Some(web::SuccessResult {
            title_detail_view: Some(web::TitleDetailView {
                title: Some(web::Title {
                    title_id: 100020,
                    name: "One Piece".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        error: None,
    }
    .encode_to_vec()
}

async fn mount_title_detail(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(title_detail()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn provider(stores: &Stores, server: &MockServer) -> MangaPlus {
    MangaPlus::with_endpoints(
        &MangaPlusConfig::default(),
        test_fetcher(),
        stores.persistent.clone(),
        stores.secrets.clone(),
        &server.uri(),
        &server.uri(),
    )
}

#[tokio::test]
async fn test_results_survive_reopening_the_store() {
    let server = MockServer::start().await;
    mount_title_detail(&server, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let config = cache_config(&temp_dir.path().join("cache.db"), true);

    {
        let stores = Stores::open(&config);
        let mangas = provider(&stores, &server).search("100020").await.unwrap();
        assert_eq!(mangas[0].name, "One Piece");
    }

    let stores = Stores::open(&config);
    let mangas = provider(&stores, &server).search("100020").await.unwrap();
    assert_eq!(mangas.len(), 1);
    assert_eq!(mangas[0].id, "100020");
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let server = MockServer::start().await;
    mount_title_detail(&server, 2).await;

    let temp_dir = TempDir::new().unwrap();
    let stores = Stores::open(&cache_config(&temp_dir.path().join("cache.db"), true));
    let provider = provider(&stores, &server);

    provider.search("100020").await.unwrap();
    provider.search("100020").await.unwrap();
    stores.clear().unwrap();
    provider.search("100020").await.unwrap();
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let server = MockServer::start().await;
    mount_title_detail(&server, 2).await;

    let temp_dir = TempDir::new().unwrap();
    let stores = Stores::open(&cache_config(&temp_dir.path().join("cache.db"), false));
    let provider = provider(&stores, &server);

    provider.search("100020").await.unwrap();
    provider.search("100020").await.unwrap();
}
