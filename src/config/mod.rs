//! Configuration module for Tankobon
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so an empty file (or no file at all)
//! yields a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use tankobon::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tankobon.toml")).unwrap();
//! println!("Downloads run concurrently: {}", config.downloader.concurrent);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, DownloaderConfig, HttpConfig, MangaPlusConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
