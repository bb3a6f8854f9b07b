//! Tavily search API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{SearchClient, SearchError, Snippet};
use crate::config::SearchConfig;

/// Tavily web-search client
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    max_results: usize,
    search_depth: String,
    http: Client,
}

impl TavilyClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        debug!(base_url = %config.base_url, "TavilyClient::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            max_results: config.max_results,
            search_depth: config.search_depth.clone(),
            http,
        })
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<Snippet>, SearchError> {
        debug!(%query, "search: called");
        let url = format!("{}/search", self.base_url);

        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
            "search_depth": self.search_depth,
        });

        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "search: API error");
            return Err(SearchError::ApiError { status, message });
        }

        let result: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let snippets: Vec<Snippet> = result
            .results
            .into_iter()
            .map(|r| Snippet {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect();

        debug!(count = snippets.len(), "search: done");
        Ok(snippets)
    }
}

// Tavily API response types

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_results() {
        let json = r#"{
            "results": [
                {"title": "Tokyo guide", "url": "https://example.com/tokyo", "content": "Visit Shibuya"},
                {"title": "Getting around", "url": "https://example.com/transit", "content": "Use the JR Pass"}
            ]
        }"#;

        let response: TavilyResponse = serde_json::from_str(json).expect("parse failed");
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].title, "Tokyo guide");
    }

    #[test]
    fn test_response_missing_results_is_empty() {
        let response: TavilyResponse = serde_json::from_str("{}").expect("parse failed");
        assert!(response.results.is_empty());
    }
}
