//! Search orchestration.

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::fetcher::{FetchRequest, PageFetcher};
use crate::fetcher_http::HttpFetcher;
use crate::parser::parse_search_results_with;
use crate::proxy::{FreeProxyList, ProxyListSource, ProxyRotator};
use crate::{CrawlerConfig, Result, SearchError, SearchOutcome, SearchQuery, SearchResult};

/// Searches the platform through a rotating set of proxies.
///
/// Each call draws proxies from its own [`ProxyRotator`] and retries the
/// fetch until one succeeds or the attempt budget runs out.
pub struct SearchClient {
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    proxy_source: Arc<dyn ProxyListSource>,
}

impl SearchClient {
    /// Creates a client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Creates a client with a custom configuration.
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        config.validate()?;
        let list_client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self {
            fetcher: Arc::new(HttpFetcher::new(config.user_agent.clone())),
            proxy_source: Arc::new(FreeProxyList::with_client(list_client)),
            config,
        })
    }

    /// Replaces the page fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replaces the source used when a query carries no proxies.
    pub fn with_proxy_source(mut self, source: Arc<dyn ProxyListSource>) -> Self {
        self.proxy_source = source;
        self
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Builds the search URL for `query`.
    pub fn search_url(&self, query: &SearchQuery) -> Result<String> {
        if query.keywords.is_empty() {
            return Err(SearchError::InvalidQuery("no keywords given".into()));
        }
        Ok(query.url(&self.config.search_endpoint()))
    }

    /// Builds the rotator for one call: the query's proxies if it has any,
    /// otherwise the remote proxy list.
    pub async fn rotator_for(&self, query: &SearchQuery) -> Result<ProxyRotator> {
        match query.explicit_proxies() {
            Some(proxies) => Ok(ProxyRotator::with_proxies(
                proxies,
                &self.config.rotator.default_scheme,
            )),
            None => {
                ProxyRotator::from_source(self.proxy_source.as_ref(), &self.config.rotator).await
            }
        }
    }

    /// Searches and returns result URLs.
    ///
    /// Failed fetch attempts are absorbed: when every attempt fails the
    /// result is an empty list, same as a page with no matches. Use
    /// [`search_outcome`](Self::search_outcome) to tell the two apart.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        Ok(self.search_outcome(query).await?.into_results())
    }

    /// Searches with a rotator scoped to this call.
    pub async fn search_outcome(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let url = self.search_url(query)?;
        let mut rotator = self.rotator_for(query).await?;
        debug!("Using a pool of {} proxies", rotator.len());
        self.run_attempts(query, &url, &mut rotator).await
    }

    /// Searches with a caller-owned rotator, leaving its queue state advanced.
    pub async fn search_with_rotator(
        &self,
        query: &SearchQuery,
        rotator: &mut ProxyRotator,
    ) -> Result<SearchOutcome> {
        let url = self.search_url(query)?;
        self.run_attempts(query, &url, rotator).await
    }

    async fn run_attempts(
        &self,
        query: &SearchQuery,
        url: &str,
        rotator: &mut ProxyRotator,
    ) -> Result<SearchOutcome> {
        let retries = query.retries.unwrap_or(self.config.retries);
        if retries == 0 {
            return Err(SearchError::InvalidQuery("retries must be greater than 0".into()));
        }
        let timeout = query.timeout.unwrap_or_else(|| self.config.timeout());

        let mut attempts = 0;
        let mut last_error = None;

        for _ in 0..retries {
            let proxy = rotator.get_proxy()?;
            attempts += 1;
            info!("Using proxy: {}", proxy);
            debug!("GET: {}", url);

            let request = FetchRequest {
                url,
                headers: &query.headers,
                proxy: Some(proxy.as_str()),
                timeout,
            };

            let html = match self.fetcher.fetch(request).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Error fetching data: {}", e);
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            match parse_search_results_with(
                &html,
                &self.config.base_url,
                &self.config.container_selector,
                &self.config.link_selector,
            ) {
                Ok(results) => {
                    if results.is_empty() {
                        info!("No urls found in {} search results.", query.category);
                    } else {
                        debug!("Found {} urls on attempt {}", results.len(), attempts);
                    }
                    return Ok(SearchOutcome::Found(results));
                }
                Err(e) => {
                    warn!("Error parsing search results: {}", e);
                    last_error = Some(e.to_string());
                }
            }
        }

        warn!("All {} fetch attempts failed", attempts);
        info!("No urls found in {} search results.", query.category);
        Ok(SearchOutcome::AllAttemptsFailed {
            attempts,
            last_error,
        })
    }
}
