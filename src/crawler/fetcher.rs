//! HTTP fetcher
//!
//! Every provider shares one [`Fetcher`]. It owns the configured `reqwest` client and
//! turns transport failures and non-2xx statuses into [`TankobonError`]s carrying the
//! requested URL. Requests are never retried.

use crate::config::HttpConfig;
use crate::{Result, TankobonError};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Builds an HTTP client from the HTTP configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use tankobon::config::HttpConfig;
/// use tankobon::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared HTTP client wrapper
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig) -> Result<Self> {
        build_http_client(config)
            .map(Self::from_client)
            .map_err(TankobonError::Client)
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends `request` and rejects non-2xx responses
    ///
    /// # Arguments
    ///
    /// * `url` - The requested URL, used in error reports
    /// * `request` - The prepared request
    pub async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response> {
        tracing::debug!("Requesting {}", url);

        let response = request.send().await.map_err(|source| TankobonError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered with HTTP {}", url, status);
            return Err(TankobonError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Sends `request` and reads the body as text
    pub async fn text(&self, url: &str, request: RequestBuilder) -> Result<String> {
        self.send(url, request)
            .await?
            .text()
            .await
            .map_err(|source| TankobonError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Sends `request` and reads the raw body
    pub async fn bytes(&self, url: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        let body = self
            .send(url, request)
            .await?
            .bytes()
            .await
            .map_err(|source| TankobonError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }

    /// Issues a plain GET and returns the body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.text(url, self.client.get(url)).await
    }
}
