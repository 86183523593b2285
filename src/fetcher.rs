//! Page fetcher abstraction for retrieving HTML content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::Result;

/// A single page request.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Target URL.
    pub url: &'a str,
    /// Extra request headers.
    pub headers: &'a HeaderMap,
    /// Proxy URL to route through, or `None` for a direct request.
    pub proxy: Option<&'a str>,
    /// Timeout for this request only.
    pub timeout: Duration,
}

/// Trait for fetching the HTML content of a URL.
///
/// Implementations must fail on non-2xx statuses as well as on transport
/// errors; the search retry loop treats any error as a failed attempt.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the body of `request.url` as text.
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<String>;
}
