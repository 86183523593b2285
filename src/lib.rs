//! # github-crawler
//!
//! Keyword search against GitHub's web search, routed through a rotating
//! pool of proxies.
//!
//! - Search repositories, issues or wikis by keywords
//! - Explicit proxy lists or a scraped public proxy list
//! - Shuffled proxy rotation with bounded, fail-soft retries
//! - Pluggable page fetcher and proxy-list source
//!
//! ## Example
//!
//! ```rust,no_run
//! use github_crawler::{SearchCategory, SearchClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SearchClient::new()?;
//!
//!     let query = SearchQuery::new("dropbox box", SearchCategory::Repositories)
//!         .with_proxies(["http://1.1.1.1:8080", "https://another.proxy:443"]);
//!     let results = client.search(&query).await?;
//!
//!     for result in &results {
//!         println!("{}", result.url);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod query;
mod result;
mod search;

pub mod fetcher;
pub mod fetcher_http;
pub mod parser;
pub mod proxy;

pub use config::{CrawlerConfig, RotatorConfig, DEFAULT_PROXIES_SOURCE};
pub use error::{Result, SearchError};
pub use query::{Keywords, SearchCategory, SearchQuery};
pub use result::{SearchOutcome, SearchResult};
pub use search::SearchClient;
