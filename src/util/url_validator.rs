use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a feed source.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The source string could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host to fetch from (and nothing to key the cache on).
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Validates a feed source given on the command line.
///
/// Only `http` and `https` URLs with a host are accepted. The host is also
/// what the cache file is keyed on, see [`cache_key`].
///
/// # Examples
///
/// ```
/// use rss_reader::util::validate_source;
///
/// let url = validate_source("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_source("file:///etc/passwd").is_err());
/// assert!(validate_source("not a url").is_err());
/// ```
pub fn validate_source(source: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(source.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost(source.to_owned())),
    }
}

/// Derives the cache file stem for a feed URL from its host.
///
/// A leading `www.` is dropped and every character outside `[A-Za-z0-9._-]`
/// becomes `_`, so the result is always a single safe path component.
pub fn cache_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);

    let key: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if key.is_empty() || key.chars().all(|c| c == '.') {
        "feed".to_string()
    } else {
        key
    }
}
