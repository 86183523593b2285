//! Error types for the crawler.

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while acquiring proxies or searching.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The remote proxy list could not be retrieved.
    #[error("Couldn't get proxies list: {0}")]
    ProxyAcquisition(String),

    /// A proxy was requested from a pool with no addresses.
    #[error("Proxy pool is empty")]
    EmptyPool,

    /// A search page fetch failed (non-2xx status or transport error).
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// HTTP client error.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Proxy address that cannot be used.
    #[error("Invalid proxy '{0}'")]
    InvalidProxy(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}
