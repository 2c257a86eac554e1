//! Integration tests for the MangaPlus provider against a mock API

use crate::test_fetcher;
use prost::Message;
use std::sync::Arc;
use tankobon::cache::{MemoryCache, SecretStore};
use tankobon::config::MangaPlusConfig;
use tankobon::providers::mangaplus::proto::{app, web, Language};
use tankobon::providers::mangaplus::{MangaPlus, APP_USER_AGENT, SECRET_NAME};
use tankobon::providers::Provider;
use tankobon::TankobonError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn web_chapter(id: u32, name: &str, sub_title: &str) -> web::Chapter {
    web::Chapter {
        title_id: 100020,
        chapter_id: id,
        name: name.to_string(),
        sub_title: sub_title.to_string(),
        ..Default::default()
    }
}

fn web_title_detail() -> Vec<u8> {
    web::Response {
        success: Some(web::SuccessResult {
            title_detail_view: Some(web::TitleDetailView {
                title: Some(web::Title {
                    title_id: 100020,
                    name: "ONE PIECE!".to_string(),
                    language: Language::Spanish as i32,
                    ..Default::default()
                }),
                chapter_list_group: vec![
                    web::ChapterListGroup {
                        first_chapter_list: vec![web_chapter(1000, "#001", "Romance Dawn")],
                        last_chapter_list: vec![web_chapter(1001, "#002", "Luffy")],
                        ..Default::default()
                    },
                    web::ChapterListGroup {
                        first_chapter_list: vec![web_chapter(1002, "#ex", "Special")],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
            ..Default::default()
        }),
        error: None,
    }
    .encode_to_vec()
}

fn app_title_detail() -> Vec<u8> {
    app::Response {
        success: Some(app::SuccessResult {
            title_detail_view: Some(app::TitleDetailView {
                title: Some(app::Title {
                    title_id: 100020,
                    title_name: "One Piece".to_string(),
                    ..Default::default()
                }),
                chapters: vec![app::ChapterGroup {
                    chapter_list: vec![app::Chapter {
                        chapter_id: 2000,
                        title_name: "#1".to_string(),
                        chapter_sub_title: "Romance Dawn".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }),
        error: None,
    }
    .encode_to_vec()
}

fn app_registration(secret: &str) -> Vec<u8> {
    app::Response {
        success: Some(app::SuccessResult {
            register_view: Some(app::RegisterView {
                secret: secret.to_string(),
            }),
            ..Default::default()
        }),
        error: None,
    }
    .encode_to_vec()
}

fn protobuf(body: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body)
        .insert_header("content-type", "application/octet-stream")
}

fn web_provider(server: &MockServer) -> MangaPlus {
    let store = Arc::new(MemoryCache::new());
    MangaPlus::with_endpoints(
        &MangaPlusConfig::default(),
        test_fetcher(),
        store.clone(),
        store,
        &server.uri(),
        &server.uri(),
    )
}

fn app_provider(server: &MockServer, secrets: Arc<MemoryCache>) -> MangaPlus {
    let config = MangaPlusConfig {
        use_app_api: true,
        ..MangaPlusConfig::default()
    };
    MangaPlus::with_endpoints(
        &config,
        test_fetcher(),
        Arc::new(MemoryCache::new()),
        secrets,
        &server.uri(),
        &server.uri(),
    )
}

#[tokio::test]
async fn test_web_search_and_chapters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .and(query_param("title_id", "100020"))
        .respond_with(protobuf(web_title_detail()))
        .expect(2)
        .mount(&server)
        .await;

    let provider = web_provider(&server);

    let mangas = provider.search(" 100020 ").await.unwrap();
    assert_eq!(mangas.len(), 1);
    assert_eq!(mangas[0].id, "100020");
    assert_eq!(mangas[0].name, "ONE PIECE");
    assert_eq!(mangas[0].url, "https://mangaplus.shueisha.co.jp/titles/100020");
    assert_eq!(mangas[0].metadata.language_iso, "es");
    assert_eq!(mangas[0].source, "MangaPlus built-in");

    // Served from the cache
    assert_eq!(provider.search("100020").await.unwrap(), mangas);

    let chapters = provider.chapters_of(&mangas[0]).await.unwrap();
    let numbers: Vec<&str> = chapters.iter().map(|c| c.number.as_str()).collect();
    let names: Vec<&str> = chapters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "2.1"]);
    assert_eq!(names, vec!["Romance Dawn", "Luffy", "Special"]);
    assert_eq!(chapters[0].id, "1000");
    assert_eq!(chapters[0].url, "https://mangaplus.shueisha.co.jp/viewer/1000");
    assert_eq!(chapters[2].index, 2);
    assert_eq!(chapters[0].manga, mangas[0].to_ref());

    provider.chapters_of(&mangas[0]).await.unwrap();
}

#[tokio::test]
async fn test_web_empty_query_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(protobuf(web_title_detail()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = web_provider(&server);
    assert!(provider.search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_web_pages_carry_keys() {
    let server = MockServer::start().await;
    let body = web::Response {
        success: Some(web::SuccessResult {
            manga_viewer: Some(web::MangaViewer {
                chapter_id: 1000,
                pages: vec![
                    web::Page {
                        manga_page: Some(web::MangaPage {
                            image_url: "https://cdn.example.com/1.jpg?key=1".to_string(),
                            encryption_key: "0f0f".to_string(),
                            ..Default::default()
                        }),
                    },
                    web::Page { manga_page: None },
                    web::Page {
                        manga_page: Some(web::MangaPage {
                            image_url: "https://cdn.example.com/2.png".to_string(),
                            ..Default::default()
                        }),
                    },
                ],
            }),
            ..Default::default()
        }),
        error: None,
    }
    .encode_to_vec();

    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .respond_with(protobuf(web_title_detail()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manga_viewer"))
        .and(query_param("chapter_id", "1000"))
        .and(query_param("split", "no"))
        .and(query_param("img_quality", "super_high"))
        .respond_with(protobuf(body))
        .expect(1)
        .mount(&server)
        .await;

    let provider = web_provider(&server);
    let manga = provider.search("100020").await.unwrap().remove(0);
    let chapter = provider.chapters_of(&manga).await.unwrap().remove(0);
    let pages = provider.pages_of(&chapter).await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].index, 0);
    assert_eq!(pages[0].extension, ".jpg");
    assert_eq!(pages[0].key.as_deref(), Some("0f0f"));
    assert_eq!(pages[1].index, 1);
    assert_eq!(pages[1].key, None);
    assert_eq!(pages[1].chapter, chapter.to_ref());
}

#[tokio::test]
async fn test_web_error_envelope() {
    let server = MockServer::start().await;
    let body = web::Response {
        success: None,
        error: Some(web::ErrorResult {
            action: 1,
            english_popup: Some(web::Popup {
                subject: "Title not found".to_string(),
                body: "The title does not exist".to_string(),
            }),
        }),
    }
    .encode_to_vec();

    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .respond_with(protobuf(body))
        .mount(&server)
        .await;

    match web_provider(&server).search("999").await {
        Err(TankobonError::Api { code, operation, .. }) => {
            assert_eq!(code, "Title not found");
            assert_eq!(operation, "title details");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_web_empty_envelope_is_unsuccessful() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .respond_with(protobuf(web::Response::default().encode_to_vec()))
        .mount(&server)
        .await;

    let result = web_provider(&server).search("999").await;
    assert!(matches!(
        result,
        Err(TankobonError::UnsuccessfulRequest { .. })
    ));
}

#[tokio::test]
async fn test_web_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title_detail"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xff, 0xff]))
        .mount(&server)
        .await;

    let result = web_provider(&server).search("999").await;
    assert!(matches!(result, Err(TankobonError::Decode { .. })));
}

#[tokio::test]
async fn test_app_registers_once_and_persists_secret() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/register"))
        .and(header("user-agent", APP_USER_AGENT))
        .and(query_param("os", "android"))
        .and(query_param("os_ver", "30"))
        .and(query_param("app_ver", "150"))
        .respond_with(protobuf(app_registration("s3cr3t")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/title_detailV2"))
        .and(query_param("secret", "s3cr3t"))
        .and(query_param("title_id", "100020"))
        .respond_with(protobuf(app_title_detail()))
        .expect(2)
        .mount(&server)
        .await;

    let secrets = Arc::new(MemoryCache::new());
    let provider = app_provider(&server, secrets.clone());

    let manga = provider.search("100020").await.unwrap().remove(0);
    assert_eq!(manga.name, "One Piece");

    let chapters = provider.chapters_of(&manga).await.unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].number, "1");
    assert_eq!(chapters[0].name, "Romance Dawn");

    assert_eq!(secrets.secret(SECRET_NAME).as_deref(), Some("s3cr3t"));
}

#[tokio::test]
async fn test_app_reuses_stored_secret() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/register"))
        .respond_with(protobuf(app_registration("fresh")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/title_detailV2"))
        .and(query_param("secret", "stored"))
        .respond_with(protobuf(app_title_detail()))
        .expect(1)
        .mount(&server)
        .await;

    let secrets = Arc::new(MemoryCache::new());
    secrets.store_secret(SECRET_NAME, "stored").unwrap();

    let provider = app_provider(&server, secrets);
    assert_eq!(provider.search("100020").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_app_error_envelope_prefers_code() {
    let server = MockServer::start().await;
    let body = app::Response {
        success: None,
        error: Some(app::ErrorResult {
            action: 2,
            default: Some(app::Popup {
                subject: "Maintenance".to_string(),
                body: String::new(),
                code: "E503".to_string(),
            }),
        }),
    }
    .encode_to_vec();

    Mock::given(method("PUT"))
        .and(path("/register"))
        .respond_with(protobuf(body))
        .mount(&server)
        .await;

    match app_provider(&server, Arc::new(MemoryCache::new())).search("100020").await {
        Err(TankobonError::Api { code, operation, .. }) => {
            assert_eq!(code, "E503");
            assert_eq!(operation, "registration");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}
