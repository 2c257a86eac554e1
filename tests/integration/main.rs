//! Integration tests for Tankobon
//!
//! These tests use wiremock to create mock HTTP servers and drive the
//! providers and the downloader end-to-end.

mod cache_tests;
mod download_tests;
mod mangaplus_tests;
mod onepiecetube_tests;

use tankobon::config::HttpConfig;
use tankobon::crawler::Fetcher;

/// Creates a fetcher suitable for talking to local mock servers
pub fn test_fetcher() -> Fetcher {
    Fetcher::new(&HttpConfig {
        user_agent: "tankobon-tests/1.0".to_string(),
        timeout_secs: 10,
    })
    .expect("Failed to build fetcher")
}
