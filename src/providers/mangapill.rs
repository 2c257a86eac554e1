//! Mangapill (`mangapill.com`)

use crate::crawler::SiteConfig;
use crate::providers::common::{chapter_number, query_escape};
use crate::ruleset::{
    attr, own_attr, own_text, selector, text, Extractor, Field, RulesetError,
};
use std::sync::Arc;
use std::time::Duration;

pub const NAME: &str = "Mangapill";

pub const BASE_URL: &str = "https://mangapill.com";

selector!(RESULT_NAME, "div a div.leading-tight");
selector!(RESULT_LINK, "div a:first-child");
selector!(RESULT_COVER, "img");

const RESULT_SELECTOR: &str = r"body > div.container.py-3 > div.my-3.grid.justify-end.gap-3.grid-cols-2.md\:grid-cols-3.lg\:grid-cols-5 > div";

pub fn search_url(query: &str) -> String {
    format!(
        "https://mangapill.com/search?q={}&type=&status=",
        query_escape(query.to_lowercase().trim())
    )
}

pub fn site() -> Result<SiteConfig, RulesetError> {
    Ok(SiteConfig {
        name: NAME.to_string(),
        base_url: BASE_URL.to_string(),
        search_url: Arc::new(search_url),
        manga_extractor: Extractor::new(RESULT_SELECTOR)?
            .field(Field::Name, |el| {
                text(el, &RESULT_NAME).trim().to_string()
            })
            .field(Field::Url, |el| attr(el, &RESULT_LINK, "href"))
            .field(Field::Cover, |el| attr(el, &RESULT_COVER, "data-src"))
            .field(Field::Language, |_| "en".to_string()),
        chapter_extractor: Extractor::new("div[data-filter-list] a")?
            .field(Field::Name, |el| own_text(el).trim().to_string())
            .field(Field::Number, |el| chapter_number(&own_text(el)))
            .field(Field::Url, |el| own_attr(el, "href")),
        page_extractor: Extractor::new("picture img")?
            .field(Field::Url, |el| own_attr(el, "data-src")),
        delay: Duration::from_millis(50),
        parallelism: 50,
        reverse_chapters: true,
        std_lang: "en".to_string(),
    })
}
