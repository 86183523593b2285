//! Search query representation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::SearchError;

/// Section of the platform to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchCategory {
    Repositories,
    Issues,
    Wikis,
}

impl SearchCategory {
    /// All categories, in declaration order.
    pub const ALL: [SearchCategory; 3] = [
        SearchCategory::Repositories,
        SearchCategory::Issues,
        SearchCategory::Wikis,
    ];

    /// Returns the category name as shown to users.
    pub fn name(&self) -> &'static str {
        match self {
            SearchCategory::Repositories => "Repositories",
            SearchCategory::Issues => "Issues",
            SearchCategory::Wikis => "Wikis",
        }
    }

    /// Returns the lowercase token used in the `type=` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SearchCategory::Repositories => "repositories",
            SearchCategory::Issues => "issues",
            SearchCategory::Wikis => "wikis",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchCategory {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SearchError::InvalidQuery(format!(
                    "unknown search type '{}', expected one of Repositories, Issues, Wikis",
                    s
                ))
            })
    }
}

/// Normalized search keywords.
///
/// Built from either a whitespace-delimited string or a sequence of tokens.
/// Both forms end up as trimmed, non-empty tokens, so `"a  b"` and
/// `["a", "b"]` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Builds keywords from a sequence of tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .flat_map(|token| {
                    token
                        .as_ref()
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect(),
        )
    }

    /// Returns the normalized tokens.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Returns whether no usable token remains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the `q=` fragment: percent-encoded tokens joined with `+`.
    pub fn query_fragment(&self) -> String {
        self.0
            .iter()
            .map(|token| urlencoding::encode(token).into_owned())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl From<&str> for Keywords {
    fn from(value: &str) -> Self {
        Self::from_tokens(value.split_whitespace())
    }
}

impl From<String> for Keywords {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for Keywords {
    fn from(value: Vec<String>) -> Self {
        Self::from_tokens(value)
    }
}

impl From<Vec<&str>> for Keywords {
    fn from(value: Vec<&str>) -> Self {
        Self::from_tokens(value)
    }
}

impl From<&[&str]> for Keywords {
    fn from(value: &[&str]) -> Self {
        Self::from_tokens(value)
    }
}

/// A single search call with its per-call options.
///
/// Options left unset fall back to the client's [`CrawlerConfig`](crate::CrawlerConfig).
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// The search terms.
    pub keywords: Keywords,
    /// Target category.
    pub category: SearchCategory,
    /// Explicit proxy pool. `None` or empty falls back to the remote list.
    pub proxies: Option<Vec<String>>,
    /// Extra request headers.
    pub headers: HeaderMap,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
    /// Attempt budget override.
    pub retries: Option<u32>,
}

impl SearchQuery {
    /// Creates a new search query.
    pub fn new(keywords: impl Into<Keywords>, category: SearchCategory) -> Self {
        Self {
            keywords: keywords.into(),
            category,
            proxies: None,
            headers: HeaderMap::new(),
            timeout: None,
            retries: None,
        }
    }

    /// Seeds the rotator with an explicit proxy list.
    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = Some(proxies.into_iter().map(Into::into).collect());
        self
    }

    /// Sets extra request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total number of fetch attempts.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Returns the explicit proxy list if it is non-empty.
    pub fn explicit_proxies(&self) -> Option<&[String]> {
        self.proxies.as_deref().filter(|proxies| !proxies.is_empty())
    }

    /// Builds `<endpoint>?q=<keywords>&type=<category>`.
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}?q={}&type={}",
            endpoint,
            self.keywords.query_fragment(),
            self.category.as_query_value()
        )
    }
}
