//! Search result types.

use serde::{Deserialize, Serialize};

/// A single matched item on the results page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Absolute result URL.
    pub url: String,
}

impl SearchResult {
    /// Creates a new search result.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Outcome of a search, keeping "no matches" apart from "every attempt failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A fetch succeeded and its page was parsed. The list may be empty.
    Found(Vec<SearchResult>),
    /// Every attempt in the retry budget failed.
    AllAttemptsFailed {
        /// Number of fetch attempts made.
        attempts: u32,
        /// Message of the last failure, if any attempt was made.
        last_error: Option<String>,
    },
}

impl SearchOutcome {
    /// Returns the results, or an empty list when every attempt failed.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Found(results) => results,
            SearchOutcome::AllAttemptsFailed { .. } => Vec::new(),
        }
    }

    /// Returns whether a fetch succeeded.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Returns whether the outcome carries no results, for either reason.
    pub fn is_empty(&self) -> bool {
        match self {
            SearchOutcome::Found(results) => results.is_empty(),
            SearchOutcome::AllAttemptsFailed { .. } => true,
        }
    }
}
