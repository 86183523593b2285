//! Search results page parsing.

use scraper::{Html, Selector};

use crate::{Result, SearchError, SearchResult};

/// Container wrapping each result title.
pub const TITLE_CONTAINER_SELECTOR: &str = "div.search-title";

/// Result link inside a title container.
pub const RESULT_LINK_SELECTOR: &str = "a.prc-Link-Link-85e08";

/// Extracts result URLs from a search results page.
///
/// Each link's `href` is appended to `base_url`. Links without an `href`
/// (or with an empty one) are skipped. A page with no matching elements
/// yields an empty list.
pub fn parse_search_results(html: &str, base_url: &str) -> Result<Vec<SearchResult>> {
    parse_search_results_with(html, base_url, TITLE_CONTAINER_SELECTOR, RESULT_LINK_SELECTOR)
}

/// Like [`parse_search_results`], with custom container and link selectors.
///
/// Fails with [`SearchError::Parse`] when a selector is not valid CSS.
pub fn parse_search_results_with(
    html: &str,
    base_url: &str,
    container_selector: &str,
    link_selector: &str,
) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);
    let container_selector = Selector::parse(container_selector)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;
    let link_selector = Selector::parse(link_selector)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))?;

    let base_url = base_url.trim_end_matches('/');
    let mut results = Vec::new();

    for container in document.select(&container_selector) {
        for link in container.select(&link_selector) {
            match link.value().attr("href") {
                Some(href) if !href.is_empty() => {
                    results.push(SearchResult::new(format!("{}{}", base_url, href)));
                }
                _ => {}
            }
        }
    }

    Ok(results)
}
