//! Field helpers shared by the HTML site definitions

use regex::Regex;
use std::sync::LazyLock;

static CHAPTER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chapter (\d+\.?\d*)").unwrap());

/// Number following `Chapter ` in a link text, or `""`
pub(crate) fn chapter_number(text: &str) -> String {
    CHAPTER_NUMBER
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str().to_string())
        .unwrap_or_default()
}

/// Splits a leading `Vol.` token off a chapter title
///
/// Returns `(volume, title)`; the volume is empty when the title has none.
pub(crate) fn split_volume(title: &str) -> (String, String) {
    if !title.starts_with("Vol.") {
        return (String::new(), title.to_string());
    }

    match title.split_once(' ') {
        Some((volume, rest)) => (volume.to_string(), rest.to_string()),
        None => (title.to_string(), String::new()),
    }
}

/// Form-encodes a search query (`+` for spaces)
pub(crate) fn query_escape(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}
