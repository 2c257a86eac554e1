use url::Url;

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, data: schemes
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Returns the file extension of a page URL, including the leading dot
///
/// Only the last path segment is considered, so query strings never leak into the
/// extension. Returns an empty string when the segment has no extension.
///
/// # Examples
///
/// ```
/// use tankobon::url::extension_of;
///
/// assert_eq!(extension_of("https://cdn.example.com/p/001.jpg?token=abc"), ".jpg");
/// assert_eq!(extension_of("https://cdn.example.com/p/001"), "");
/// ```
pub fn extension_of(address: &str) -> String {
    let path = match Url::parse(address) {
        Ok(url) => url.path().to_string(),
        Err(_) => address.split(['?', '#']).next().unwrap_or("").to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rfind('.') {
        Some(pos) if pos + 1 < segment.len() => segment[pos..].to_string(),
        _ => String::new(),
    }
}
