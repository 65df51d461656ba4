//! Web search capability.
//!
//! The pipeline only needs `{title, url, content}` triples; `SearchClient`
//! hides which API produced them. `create_search_client()` returns `None`
//! when no provider credentials are configured.

pub mod tavily;

use crate::config::SearchConfig;
use crate::error::{ConfigError, SearchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use tavily::TavilyClient;

/// One raw hit from a search API, before credibility scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Trait for web search backends.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search for `query`, returning at most `max_results` raw hits.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Scripted search backend for tests.
///
/// Returns the same hits (or the same error) on every call and records the
/// `max_results` of the most recent request.
pub struct MockSearchClient {
    outcome: Result<Vec<SearchHit>, String>,
    calls: AtomicUsize,
    last_max_results: Mutex<Option<usize>>,
}

impl MockSearchClient {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            outcome: Ok(hits),
            calls: AtomicUsize::new(0),
            last_max_results: Mutex::new(None),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_max_results: Mutex::new(None),
        }
    }

    /// Number of `search` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_max_results(&self) -> Option<usize> {
        *self
            .last_max_results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_max_results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(max_results);
        match &self.outcome {
            Ok(hits) => Ok(hits.iter().take(max_results).cloned().collect()),
            Err(message) => Err(SearchError::Request {
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Create the search client named in `config`, if credentials are present.
pub fn create_search_client(
    config: &SearchConfig,
) -> Result<Option<Arc<dyn SearchClient>>, ConfigError> {
    let Some(api_key) = config.api_key() else {
        tracing::debug!(env = %config.api_key_env, "No search API key configured");
        return Ok(None);
    };

    match config.provider.as_str() {
        "tavily" => Ok(Some(Arc::new(TavilyClient::new(config, api_key)))),
        other => Err(ConfigError::UnsupportedProvider {
            kind: "search".to_string(),
            name: other.to_string(),
        }),
    }
}
