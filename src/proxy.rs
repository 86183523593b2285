//! Rotating proxy pool.
//!
//! A [`ProxyRotator`] holds a fixed pool of proxy addresses and hands them out
//! one at a time in shuffled order. When the draw queue runs dry it is refilled
//! with a fresh shuffle of the whole pool, so draws never fail on a non-empty
//! pool. The pool comes either from the caller or from a [`ProxyListSource`].

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::config::RotatorConfig;
use crate::{Result, SearchError};

/// Prepends `default_scheme://` to an address that has no scheme.
pub fn normalize_proxy(address: &str, default_scheme: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("{}://{}", default_scheme, address)
    }
}

/// Strategy for retrieving a list of proxy addresses.
///
/// Returned addresses may lack a scheme; the rotator normalizes them.
#[async_trait]
pub trait ProxyListSource: Send + Sync {
    /// Fetches proxies from `source`, making at most `retries` attempts.
    async fn fetch_proxy_list(&self, source: &str, retries: u32) -> Result<Vec<String>>;
}

/// Scrapes the `ip:port` table published by free-proxy-list.net style pages.
pub struct FreeProxyList {
    client: Client,
}

impl FreeProxyList {
    /// Creates a source with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a source with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for FreeProxyList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProxyListSource for FreeProxyList {
    async fn fetch_proxy_list(&self, source: &str, retries: u32) -> Result<Vec<String>> {
        info!("Getting proxies list from {}...", source);

        for attempt in 0..retries {
            if attempt > 0 {
                info!("Retrying to get proxies list... ({}/{})", attempt, retries);
            }

            // Transport failures abort; only non-200 statuses are retried.
            let response = self
                .client
                .get(source)
                .send()
                .await
                .map_err(|e| SearchError::ProxyAcquisition(e.to_string()))?;

            if response.status() != StatusCode::OK {
                warn!(
                    "Failed to get proxies list from {}. Status code: {}",
                    source,
                    response.status().as_u16()
                );
                continue;
            }

            let html = response
                .text()
                .await
                .map_err(|e| SearchError::ProxyAcquisition(e.to_string()))?;
            let proxies = parse_proxy_table(&html)?;
            debug!("Fetched {} proxies from {}", proxies.len(), source);
            return Ok(proxies);
        }

        Ok(Vec::new())
    }
}

/// Extracts `ip:port` pairs from the first two cells of each table row,
/// skipping the header row.
pub fn parse_proxy_table(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table.table.table-striped.table-bordered")
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
    let row_selector = Selector::parse("tr")
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
    let cell_selector = Selector::parse("td")
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| SearchError::ProxyAcquisition("proxy table not found".to_string()))?;

    let mut proxies = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .take(2)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        match cells.as_slice() {
            [ip, port] if !ip.is_empty() && !port.is_empty() => {
                proxies.push(format!("{}:{}", ip, port));
            }
            // Short rows are dropped; the rest of the table is still usable.
            _ => debug!("Skipping malformed proxy table row"),
        }
    }

    Ok(proxies)
}

/// Hands out proxies from a fixed pool in shuffled rounds.
#[derive(Debug, Clone)]
pub struct ProxyRotator {
    proxies: Vec<String>,
    queue: Vec<String>,
}

impl ProxyRotator {
    /// Creates a rotator over an explicit list of proxies.
    pub fn with_proxies<I, S>(proxies: I, default_scheme: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let proxies = proxies
            .into_iter()
            .map(|proxy| normalize_proxy(proxy.as_ref(), default_scheme))
            .collect();
        Self {
            proxies,
            queue: Vec::new(),
        }
    }

    /// Creates a rotator from proxies fetched through `source`.
    ///
    /// A source that yields nothing produces an empty pool; the error then
    /// surfaces on the first [`get_proxy`](Self::get_proxy).
    pub async fn from_source(source: &dyn ProxyListSource, config: &RotatorConfig) -> Result<Self> {
        let proxies = source
            .fetch_proxy_list(&config.proxies_source, config.get_proxies_retries)
            .await?;
        if proxies.is_empty() {
            warn!("No proxies available from {}", config.proxies_source);
        }
        Ok(Self::with_proxies(proxies, &config.default_scheme))
    }

    /// Draws the next proxy, reshuffling the whole pool when the queue is empty.
    pub fn get_proxy(&mut self) -> Result<String> {
        if self.proxies.is_empty() {
            return Err(SearchError::EmptyPool);
        }

        if self.queue.is_empty() {
            self.queue = self.proxies.clone();
            self.queue.shuffle(&mut rand::thread_rng());
            debug!("Refilled proxy queue with {} proxies", self.queue.len());
        }

        self.queue.pop().ok_or(SearchError::EmptyPool)
    }

    /// Returns the full, normalized pool.
    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    /// Returns the number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Returns whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Returns how many draws remain before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
