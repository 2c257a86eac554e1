//! Generic crawl engine
//!
//! This module contains the machinery behind every HTML provider:
//! - HTTP fetching with status classification
//! - Per-site request spacing and concurrency limits
//! - Declarative site descriptions
//! - The cached search / chapters / pages engine

mod engine;
mod fetcher;
mod site;
mod throttle;

pub use engine::{parse_chapters, parse_mangas, parse_pages, reverse_chapters, GenericProvider};
pub use fetcher::{build_http_client, Fetcher};
pub use site::{SearchUrlFn, SiteConfig};
pub use throttle::Throttle;
