//! Integration tests for the OnePiece-Tube provider

use crate::test_fetcher;
use std::sync::Arc;
use tankobon::cache::MemoryCache;
use tankobon::providers::onepiecetube::OnePieceTube;
use tankobon::providers::Provider;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAPTER_LIST: &str = concat!(
    "<html><body><script>window.__data = {",
    "&quot;entries&quot;:[",
    "{&quot;name&quot;:&quot;Der Neue&quot;,&quot;number&quot;:3,&quot;is_available&quot;:false,&quot;href&quot;:&quot;/kapitel/3&quot;},",
    "{&quot;name&quot;:&quot;Ruffy &amp; Zorro&quot;,&quot;number&quot;:2,&quot;is_available&quot;:true,&quot;href&quot;:&quot;/kapitel/2&quot;},",
    "{&quot;name&quot;:&quot; Romance Dawn &quot;,&quot;number&quot;:1,&quot;is_available&quot;:true,&quot;href&quot;:&quot;/kapitel/1&quot;}",
    "]};</script></body></html>"
);

fn chapter_page(server: &MockServer) -> String {
    format!(
        "<html><body><script>window.__data = {{&quot;chapter&quot;:{{&quot;pages&quot;:[\
         {{&quot;url&quot;:&quot;{0}/img/01.png&quot;}},{{&quot;url&quot;:&quot;{0}/img/02.jpg&quot;}}\
         ]}}}};</script></body></html>",
        server.uri()
    )
}

fn provider(server: &MockServer) -> OnePieceTube {
    OnePieceTube::with_manga_url(
        test_fetcher(),
        Arc::new(MemoryCache::new()),
        &format!("{}/kapitel-mangaliste", server.uri()),
    )
}

#[tokio::test]
async fn test_chapters_are_available_and_oldest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kapitel-mangaliste"))
        .and(header("referer", "https://onepiece-tube.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHAPTER_LIST))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let manga = provider.search("anything").await.unwrap().remove(0);
    assert_eq!(manga.name, "One Piece");
    assert_eq!(manga.metadata.language_iso, "de");

    let chapters = provider.chapters_of(&manga).await.unwrap();
    let names: Vec<&str> = chapters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Romance Dawn", "Ruffy & Zorro"]);
    assert_eq!(chapters[0].index, 1);
    assert_eq!(chapters[1].index, 2);
    assert_eq!(chapters[1].number, "2");
    assert_eq!(chapters[1].id, "2");
    assert_eq!(chapters[1].url, format!("{}/kapitel/2", server.uri()));

    // Second call is a cache hit
    assert_eq!(provider.chapters_of(&manga).await.unwrap(), chapters);
}

#[tokio::test]
async fn test_pages_are_fetched_every_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kapitel-mangaliste"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHAPTER_LIST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kapitel/1"))
        .and(header("referer", "https://onepiece-tube.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(chapter_page(&server)))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let manga = provider.search("").await.unwrap().remove(0);
    let chapter = provider.chapters_of(&manga).await.unwrap().remove(0);

    let pages = provider.pages_of(&chapter).await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, format!("{}/img/01.png", server.uri()));
    assert_eq!(pages[0].extension, ".png");
    assert_eq!(pages[1].index, 1);
    assert_eq!(pages[1].chapter, chapter.to_ref());

    assert_eq!(provider.pages_of(&chapter).await.unwrap(), pages);
}

#[tokio::test]
async fn test_page_without_embedded_data_has_no_chapters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kapitel-mangaliste"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Wartung</html>"))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let manga = provider.search("").await.unwrap().remove(0);
    assert!(provider.chapters_of(&manga).await.unwrap().is_empty());
}
