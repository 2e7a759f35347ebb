use regex::Regex;
use std::sync::LazyLock;

/// `http(s)://` followed by unreserved, reserved/sub-delimiter characters
/// and percent-encoded octets. Quotes and angle brackets end a match, so
/// URLs inside raw HTML attributes come out clean.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})+")
        .expect("URL pattern is a valid regex")
});

/// Finds URL-shaped substrings in free text, in order of appearance.
pub fn find_urls(text: &str) -> impl Iterator<Item = &str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Whether an attribute value should be collected as a link.
///
/// The whole value is kept, not just the URL-shaped part.
pub fn is_link_attribute(value: &str) -> bool {
    value.contains("http://") || value.contains("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_url_in_text() {
        let urls: Vec<_> = find_urls("see https://example.com/b for details").collect();
        assert_eq!(urls, vec!["https://example.com/b"]);
    }

    #[test]
    fn test_finds_multiple_in_order() {
        let urls: Vec<_> =
            find_urls("http://a.example/x then https://b.example/y?q=1&r=%20").collect();
        assert_eq!(urls, vec!["http://a.example/x", "https://b.example/y?q=1&r=%20"]);
    }

    #[test]
    fn test_stops_at_html_quote() {
        let urls: Vec<_> =
            find_urls(r#"<a href="https://example.com/path">text</a>"#).collect();
        assert_eq!(urls, vec!["https://example.com/path"]);
    }

    #[test]
    fn test_bare_scheme_is_not_a_url() {
        assert_eq!(find_urls("https:// nothing").count(), 0);
        assert_eq!(find_urls("plain text").count(), 0);
    }

    #[test]
    fn test_link_attribute() {
        assert!(is_link_attribute("https://example.com/a"));
        assert!(is_link_attribute("see http://example.com"));
        assert!(!is_link_attribute("image/jpeg"));
        assert!(!is_link_attribute("httpbin"));
    }
}
