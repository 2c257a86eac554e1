//! Helpers for writing field functions
//!
//! The helpers take compiled selectors; site modules declare theirs once with
//! `selector!`.

use scraper::{ElementRef, Selector};

/// Concatenated text of every descendant of `element` matching `selector`
pub fn text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|matched| matched.text())
        .collect()
}

/// Attribute `name` of the first descendant matching `selector`, or `""`
pub fn attr(element: ElementRef<'_>, selector: &Selector, name: &str) -> String {
    element
        .select(selector)
        .next()
        .and_then(|matched| matched.value().attr(name))
        .unwrap_or("")
        .to_string()
}

/// Text content of `element` itself
pub fn own_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Attribute `name` of `element` itself, or `""`
pub fn own_attr(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or("").to_string()
}
