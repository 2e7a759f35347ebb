use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;

/// Errors that can occur while fetching a feed.
///
/// A fetch makes exactly one request; none of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Connection error: {0}")]
    Network(#[from] reqwest::Error),
    /// Server answered 404
    #[error("No RSS found at {0}")]
    NotFound(String),
    /// Any other non-2xx status
    #[error("HTTP error: status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Response body exceeded the configured size limit
    #[error("Response too large (limit {0} bytes)")]
    ResponseTooLarge(usize),
    /// Received fewer bytes than Content-Length announced
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Retrieves raw feed bytes over HTTP.
///
/// Holds one `reqwest::Client` configured from [`Config`]; the client is
/// cheap to clone and reuses connections.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_size: usize,
}

impl Fetcher {
    /// Builds a fetcher with the configured user agent, timeout and size cap.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(
            client,
            Duration::from_secs(config.timeout_secs),
            config.max_feed_size,
        ))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration, max_size: usize) -> Self {
        Self {
            client,
            timeout,
            max_size,
        }
    }

    /// Performs a single GET and returns the body on a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - connection, TLS or body read errors
    /// - [`FetchError::Timeout`] - no response within the timeout
    /// - [`FetchError::NotFound`] - 404
    /// - [`FetchError::HttpStatus`] - any other non-2xx status
    /// - [`FetchError::ResponseTooLarge`] / [`FetchError::IncompleteResponse`]
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        tracing::info!(url = %url, "Fetching feed");

        let response = tokio::time::timeout(self.timeout, self.client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))?
            .map_err(FetchError::Network)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let bytes = tokio::time::timeout(self.timeout, read_limited_bytes(response, self.max_size))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))??;

        tracing::info!(url = %url, bytes = bytes.len(), "Feed contents downloaded");
        Ok(bytes)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: Content-Length already over the limit
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
