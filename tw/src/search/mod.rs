//! Search adapter for TripWeaver
//!
//! Thin contract over the web-search provider: query in, ranked snippets
//! out. An empty result list is a valid answer, not a failure; the pipeline
//! decides how to present "no information found".

use async_trait::async_trait;
use thiserror::Error;

mod tavily;

pub use tavily::TavilyClient;

/// One ranked search result
#[derive(Debug, Clone)]
pub struct Snippet {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Errors surfaced by the search adapter
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Contract over the search provider
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one search query, returning ranked snippets (possibly empty)
    async fn search(&self, query: &str) -> Result<Vec<Snippet>, SearchError>;
}
