/// Extract the domain of a page URL.
///
/// Strips an `http://` or `https://` scheme and keeps everything up to the
/// first `/`. Ports and credentials are kept as part of the domain; other
/// schemes are not stripped.
pub fn extract_domain(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}
