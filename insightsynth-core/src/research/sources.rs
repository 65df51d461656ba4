//! Source providers: where candidate sources for a topic come from.
//!
//! `WebSourceProvider` asks a search backend and ranks the hits by
//! credibility. `SyntheticSourceProvider` derives a fixed catalog from the
//! topic and is also the web provider's fallback.

use super::credibility::{DEFAULT_MIN_CREDIBILITY, rank_sources};
use super::output::clamp_credibility;
use crate::error::ResearchError;
use crate::search::SearchClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A candidate source for a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub content: String,
    pub credibility_score: f64,
}

impl Source {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        credibility_score: f64,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            credibility_score: clamp_credibility(credibility_score),
        }
    }
}

/// Supplies a bounded list of sources for a topic.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Return at most `max_results` sources. `max_results == 0` is rejected.
    async fn provide(&self, topic: &str, max_results: usize) -> Result<Vec<Source>, ResearchError>;

    /// Provider name for logs and health output.
    fn name(&self) -> &str;
}

fn ensure_positive(max_results: usize) -> Result<(), ResearchError> {
    if max_results == 0 {
        return Err(ResearchError::invalid("max_results must be at least 1"));
    }
    Ok(())
}

/// URL path segment for a topic: spaces become hyphens, the rest is
/// percent-encoded.
pub fn topic_slug(topic: &str) -> String {
    urlencoding::encode(&topic.replace(' ', "-")).into_owned()
}

/// The deterministic three-entry catalog derived from `topic`.
pub fn synthetic_catalog(topic: &str) -> Vec<Source> {
    let slug = topic_slug(topic);
    vec![
        Source::new(
            format!("Research Study on {topic}"),
            format!("https://example-university.edu/research/{slug}"),
            format!(
                "This comprehensive study examines {topic} through multiple methodological \
                 approaches. The research presents significant findings that contribute to \
                 our understanding of the field."
            ),
            0.9,
        ),
        Source::new(
            format!("Analysis of {topic} Trends"),
            format!("https://research-institute.org/analysis/{slug}"),
            format!(
                "An in-depth analysis of current trends in {topic}, based on extensive data \
                 collection and statistical analysis."
            ),
            0.8,
        ),
        Source::new(
            format!("{topic}: A Comprehensive Review"),
            format!("https://academic-journal.edu/review/{slug}"),
            format!(
                "This review synthesizes current knowledge about {topic}, examining various \
                 perspectives and methodologies used in recent research."
            ),
            0.85,
        ),
    ]
}

/// Provider backed by the synthetic catalog only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSourceProvider;

#[async_trait]
impl SourceProvider for SyntheticSourceProvider {
    async fn provide(&self, topic: &str, max_results: usize) -> Result<Vec<Source>, ResearchError> {
        ensure_positive(max_results)?;
        let mut sources = synthetic_catalog(topic);
        sources.truncate(max_results);
        Ok(sources)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Provider that queries a search backend and ranks the results.
///
/// Search errors and empty (or fully filtered) result sets degrade to the
/// synthetic catalog.
pub struct WebSourceProvider {
    client: Arc<dyn SearchClient>,
    min_credibility: f64,
    fallback: SyntheticSourceProvider,
}

impl WebSourceProvider {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            min_credibility: DEFAULT_MIN_CREDIBILITY,
            fallback: SyntheticSourceProvider,
        }
    }

    pub fn with_min_credibility(mut self, min_credibility: f64) -> Self {
        self.min_credibility = clamp_credibility(min_credibility);
        self
    }
}

#[async_trait]
impl SourceProvider for WebSourceProvider {
    async fn provide(&self, topic: &str, max_results: usize) -> Result<Vec<Source>, ResearchError> {
        ensure_positive(max_results)?;

        // Ask for twice as many hits so filtering has headroom.
        let requested = max_results.saturating_mul(2);
        match self.client.search(topic, requested).await {
            Ok(hits) => {
                let raw = hits.len();
                let ranked = rank_sources(hits, self.min_credibility, max_results);
                debug!(
                    backend = self.client.name(),
                    raw,
                    kept = ranked.len(),
                    "Ranked search hits"
                );
                if !ranked.is_empty() {
                    info!(topic, count = ranked.len(), "Found credible sources");
                    return Ok(ranked);
                }
                warn!(topic, raw, "No credible search results, using synthetic catalog");
            }
            Err(e) => {
                warn!(topic, error = %e, "Search failed, using synthetic catalog");
            }
        }
        self.fallback.provide(topic, max_results).await
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{MockSearchClient, SearchHit};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_topic_slug() {
        assert_eq!(topic_slug("quantum computing"), "quantum-computing");
        assert_eq!(topic_slug("C++ & Rust"), "C%2B%2B-%26-Rust");
    }

    #[test]
    fn test_synthetic_catalog_entries() {
        let catalog = synthetic_catalog("soil health");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].title, "Research Study on soil health");
        assert_eq!(
            catalog[1].url,
            "https://research-institute.org/analysis/soil-health"
        );
        assert_eq!(catalog[2].title, "soil health: A Comprehensive Review");
        let scores: Vec<f64> = catalog.iter().map(|s| s.credibility_score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.85]);
    }

    #[tokio::test]
    async fn test_synthetic_truncates() {
        let sources = SyntheticSourceProvider.provide("x", 2).await.unwrap();
        assert_eq!(sources.len(), 2);
        let sources = SyntheticSourceProvider.provide("x", 10).await.unwrap();
        assert_eq!(sources.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_max_results_rejected() {
        let err = SyntheticSourceProvider.provide("x", 0).await.unwrap_err();
        assert!(matches!(err, ResearchError::InvalidRequest { .. }));

        let client = Arc::new(MockSearchClient::with_hits(vec![]));
        let provider = WebSourceProvider::new(client.clone());
        assert!(provider.provide("x", 0).await.is_err());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_web_provider_ranks_hits() {
        let client = Arc::new(MockSearchClient::with_hits(vec![
            SearchHit::new("Blog", "https://blog.example.com/a", ""),
            SearchHit::new("Study", "https://lab.mit.edu/b", "research"),
            SearchHit::new("Notes", "https://site.io/c", ""),
        ]));
        let provider = WebSourceProvider::new(client.clone());
        let sources = provider.provide("fusion", 2).await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url, "https://lab.mit.edu/b");
        assert_eq!(sources[1].url, "https://blog.example.com/a");
        assert_eq!(client.last_max_results(), Some(4));
    }

    #[tokio::test]
    async fn test_web_provider_falls_back_on_error() {
        let client = Arc::new(MockSearchClient::failing("connection refused"));
        let provider = WebSourceProvider::new(client);
        let sources = provider.provide("fusion", 3).await.unwrap();
        assert_eq!(sources, synthetic_catalog("fusion"));
    }

    #[tokio::test]
    async fn test_web_provider_falls_back_on_empty_results() {
        let client = Arc::new(MockSearchClient::with_hits(vec![]));
        let provider = WebSourceProvider::new(client.clone());
        let sources = provider.provide("tidal power", 2).await.unwrap();
        assert_eq!(client.calls(), 1);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources, synthetic_catalog("tidal power")[..2].to_vec());
    }

    #[tokio::test]
    async fn test_web_provider_falls_back_when_all_filtered() {
        let client = Arc::new(MockSearchClient::with_hits(vec![SearchHit::new(
            "Notes",
            "https://site.io/c",
            "",
        )]));
        let provider = WebSourceProvider::new(client);
        let sources = provider.provide("fusion", 1).await.unwrap();
        assert_eq!(sources[0].title, "Research Study on fusion");
    }

    #[tokio::test]
    async fn test_custom_min_credibility() {
        let client = Arc::new(MockSearchClient::with_hits(vec![SearchHit::new(
            "Notes",
            "https://site.io/c",
            "",
        )]));
        let provider = WebSourceProvider::new(client).with_min_credibility(0.5);
        let sources = provider.provide("fusion", 1).await.unwrap();
        assert_eq!(sources[0].url, "https://site.io/c");
    }
}
