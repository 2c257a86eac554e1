//! Tankobon: a manga catalog fetcher
//!
//! This crate fetches catalog, chapter-list and page-list data from manga sites and
//! APIs and normalizes it into one entity model (manga → chapters → pages), with a
//! per-query cache in front of every provider.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod download;
pub mod model;
pub mod numbering;
pub mod providers;
pub mod ruleset;
pub mod url;

use thiserror::Error;

/// Main error type for Tankobon operations
#[derive(Debug, Error)]
pub enum TankobonError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("{provider}: failed to decode {operation} response: {message}")]
    Decode {
        provider: String,
        operation: &'static str,
        message: String,
    },

    #[error("{provider}: API error during {operation}: {code}")]
    Api {
        provider: String,
        operation: &'static str,
        code: String,
    },

    #[error("{provider}: unsuccessful {operation} request")]
    UnsuccessfulRequest {
        provider: String,
        operation: &'static str,
    },

    #[error("Ruleset error: {0}")]
    Ruleset(#[from] ruleset::RulesetError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Download error: {0}")]
    Download(#[from] download::DownloadError),

    #[error("Invalid page key: {0}")]
    InvalidKey(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Tankobon operations
pub type Result<T> = std::result::Result<T, TankobonError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Chapter, Manga, Page};
pub use providers::{builtin_providers, Provider};
