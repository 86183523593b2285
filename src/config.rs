//! Crawler and proxy rotator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parser::{RESULT_LINK_SELECTOR, TITLE_CONTAINER_SELECTOR};
use crate::{Result, SearchError};

/// Default public proxy list page.
pub const DEFAULT_PROXIES_SOURCE: &str = "https://free-proxy-list.net/";

/// Configuration for proxy pool construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// Attempts allowed when fetching the remote proxy list.
    #[serde(default = "default_get_proxies_retries")]
    pub get_proxies_retries: u32,
    /// Page listing public proxies, used only when no explicit list is given.
    #[serde(default = "default_proxies_source")]
    pub proxies_source: String,
    /// Scheme prepended to addresses that carry none.
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
}

fn default_get_proxies_retries() -> u32 {
    5
}

fn default_proxies_source() -> String {
    DEFAULT_PROXIES_SOURCE.to_string()
}

fn default_scheme() -> String {
    "http".to_string()
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            get_proxies_retries: default_get_proxies_retries(),
            proxies_source: default_proxies_source(),
            default_scheme: default_scheme(),
        }
    }
}

/// Configuration for a [`SearchClient`](crate::SearchClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Platform base URL, also prefixed to every result href.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the search endpoint under `base_url`.
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Total fetch attempts per search.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// CSS selector of the element wrapping each result title.
    #[serde(default = "default_container_selector")]
    pub container_selector: String,
    /// CSS selector of the result link inside a title container.
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    /// Proxy pool settings.
    #[serde(default)]
    pub rotator: RotatorConfig,
}

fn default_base_url() -> String {
    "https://github.com".to_string()
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; github-crawler/0.1)".to_string()
}

fn default_container_selector() -> String {
    TITLE_CONTAINER_SELECTOR.to_string()
}

fn default_link_selector() -> String {
    RESULT_LINK_SELECTOR.to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            timeout_secs: default_timeout(),
            retries: default_retries(),
            user_agent: default_user_agent(),
            container_selector: default_container_selector(),
            link_selector: default_link_selector(),
            rotator: RotatorConfig::default(),
        }
    }
}

impl CrawlerConfig {
    /// Returns the full search endpoint, e.g. `https://github.com/search`.
    pub fn search_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks that every bound is usable.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SearchError::Config("timeout_secs must be greater than 0".into()));
        }
        if self.retries == 0 {
            return Err(SearchError::Config("retries must be greater than 0".into()));
        }
        if self.rotator.get_proxies_retries == 0 {
            return Err(SearchError::Config(
                "get_proxies_retries must be greater than 0".into(),
            ));
        }
        if self.rotator.default_scheme.is_empty() {
            return Err(SearchError::Config("default_scheme must not be empty".into()));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }
}
