//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::fetcher::{FetchRequest, PageFetcher};
use crate::{Result, SearchError};

/// A page fetcher that issues plain GET requests via reqwest.
///
/// reqwest binds proxies to the client, so a client is built per request
/// when a proxy is given. Requests without a proxy ignore any proxy set in
/// the environment.
pub struct HttpFetcher {
    user_agent: String,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` sending the given User-Agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<Client> {
        let builder = Client::builder().user_agent(&self.user_agent);
        let builder = match proxy {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url)
                    .map_err(|_| SearchError::InvalidProxy(proxy_url.to_string()))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        builder
            .build()
            .map_err(|e| SearchError::Fetch(format!("Failed to create HTTP client: {}", e)))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<String> {
        let client = self.client_for(request.proxy)?;
        let response = client
            .get(request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Fetch(format!(
                "{} returned status {}",
                request.url,
                status.as_u16()
            )));
        }

        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), request.url);
        Ok(html)
    }
}
