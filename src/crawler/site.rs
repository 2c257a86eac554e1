use crate::ruleset::Extractor;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builds the search URL for a query
pub type SearchUrlFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Declarative description of an HTML site driven by the generic crawl engine
#[derive(Clone)]
pub struct SiteConfig {
    /// Display name; the provider ID is derived from it
    pub name: String,

    pub base_url: String,

    pub search_url: SearchUrlFn,

    /// Pulls catalog items out of a search result page
    pub manga_extractor: Extractor,

    /// Pulls chapters out of a manga page
    pub chapter_extractor: Extractor,

    /// Pulls page images out of a chapter page
    pub page_extractor: Extractor,

    /// Minimum time between two request starts
    pub delay: Duration,

    /// Maximum concurrent requests
    pub parallelism: usize,

    /// The site lists chapters newest first
    pub reverse_chapters: bool,

    /// Language assumed when a manga carries none
    pub std_lang: String,
}

impl SiteConfig {
    /// Provider ID, `"{name} built-in"`
    pub fn id(&self) -> String {
        format!("{} built-in", self.name)
    }

    pub fn search_url_for(&self, query: &str) -> String {
        (self.search_url)(query)
    }
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("manga_extractor", &self.manga_extractor)
            .field("chapter_extractor", &self.chapter_extractor)
            .field("page_extractor", &self.page_extractor)
            .field("delay", &self.delay)
            .field("parallelism", &self.parallelism)
            .field("reverse_chapters", &self.reverse_chapters)
            .field("std_lang", &self.std_lang)
            .finish()
    }
}
