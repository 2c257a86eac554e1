//! Manganelo (`ww5.manganelo.tv`)

use crate::crawler::SiteConfig;
use crate::providers::common::{chapter_number, query_escape, split_volume};
use crate::ruleset::{attr, own_attr, selector, text, Extractor, Field, RulesetError};
use std::sync::Arc;
use std::time::Duration;

pub const NAME: &str = "Manganelo";

pub const BASE_URL: &str = "https://ww5.manganelo.tv/";

selector!(ITEM_TITLE, "a.item-title");
selector!(ITEM_COVER, ".item-img img");
selector!(CHAPTER_NAME, ".chapter-name");

pub fn search_url(query: &str) -> String {
    format!(
        "https://ww5.manganelo.tv/search/{}",
        query_escape(&query.trim().to_lowercase())
    )
}

pub fn site() -> Result<SiteConfig, RulesetError> {
    Ok(SiteConfig {
        name: NAME.to_string(),
        base_url: BASE_URL.to_string(),
        search_url: Arc::new(search_url),
        manga_extractor: Extractor::new(".search-story-item")?
            .field(Field::Name, |el| text(el, &ITEM_TITLE).trim().to_string())
            .field(Field::Url, |el| attr(el, &ITEM_TITLE, "href"))
            .field(Field::Cover, |el| attr(el, &ITEM_COVER, "src")),
        chapter_extractor: Extractor::new("li.a-h")?
            .field(Field::Name, |el| split_volume(&text(el, &CHAPTER_NAME)).1)
            .field(Field::Number, |el| chapter_number(&text(el, &CHAPTER_NAME)))
            .field(Field::Url, |el| attr(el, &CHAPTER_NAME, "href"))
            .field(Field::Volume, |el| split_volume(&text(el, &CHAPTER_NAME)).0),
        page_extractor: Extractor::new(".container-chapter-reader img")?
            .field(Field::Url, |el| own_attr(el, "data-src")),
        delay: Duration::from_millis(50),
        parallelism: 50,
        reverse_chapters: true,
        std_lang: "en".to_string(),
    })
}
