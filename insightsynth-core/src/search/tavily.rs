//! Tavily search API client.

use super::{SearchClient, SearchHit};
use crate::config::SearchConfig;
use crate::error::SearchError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Client for the Tavily `/search` endpoint.
pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    search_depth: String,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

impl TavilyClient {
    pub fn new(config: &SearchConfig, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("InsightSynth/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            search_depth: config.search_depth.clone(),
            include_domains: config.include_domains.clone(),
            exclude_domains: config.exclude_domains.clone(),
        }
    }

    fn build_request_body(&self, query: &str, max_results: usize) -> Value {
        serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "search_depth": self.search_depth,
            "max_results": max_results,
            "include_domains": self.include_domains,
            "exclude_domains": self.exclude_domains,
        })
    }

    /// Extract hits from a Tavily response. Entries without a URL are skipped.
    fn parse_results(body: &Value) -> Result<Vec<SearchHit>, SearchError> {
        let results = body
            .get("results")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SearchError::ResponseParse {
                message: "Missing 'results' array in response".to_string(),
            })?;

        Ok(results
            .iter()
            .filter_map(|r| {
                let url = r.get("url").and_then(|v| v.as_str())?;
                if url.is_empty() {
                    return None;
                }
                let title = r.get("title").and_then(|v| v.as_str()).unwrap_or("");
                let content = r.get("content").and_then(|v| v.as_str()).unwrap_or("");
                Some(SearchHit::new(title, url, content))
            })
            .collect())
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/search", self.base_url);
        debug!(query, max_results, "Sending Tavily search request");

        let response = self
            .client
            .post(&url)
            .json(&self.build_request_body(query, max_results))
            .send()
            .await
            .map_err(|e| SearchError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| SearchError::Request {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body: Value =
            serde_json::from_str(&body_text).map_err(|e| SearchError::ResponseParse {
                message: format!("Invalid JSON in response: {}", e),
            })?;

        let mut hits = Self::parse_results(&body)?;
        hits.truncate(max_results);
        Ok(hits)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
