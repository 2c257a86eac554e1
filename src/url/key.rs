use url::Url;

/// Derives the cache key for a target URL
///
/// The scheme and host are dropped so that the same resource reached through a
/// different mirror or scheme shares one cache entry.
///
/// # Key Format
///
/// `{path}` followed by `&{query}` when a query is present and `#{fragment}` when a
/// fragment is present. Input that does not parse as an absolute URL is used
/// verbatim.
///
/// # Examples
///
/// ```
/// use tankobon::url::cache_key;
///
/// assert_eq!(cache_key("https://example.com/manga/1?page=2"), "/manga/1&page=2");
/// assert_eq!(cache_key("http://mirror.example.org/manga/1?page=2"), "/manga/1&page=2");
/// ```
pub fn cache_key(address: &str) -> String {
    let parsed = match Url::parse(address) {
        Ok(url) => url,
        Err(_) => return address.to_string(),
    };

    let mut key = parsed.path().to_string();

    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        key.push('&');
        key.push_str(query);
    }

    if let Some(fragment) = parsed.fragment().filter(|f| !f.is_empty()) {
        key.push('#');
        key.push_str(fragment);
    }

    key
}
