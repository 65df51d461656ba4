//! Research engine: assembles a report from the four capabilities.
//!
//! Pipeline order is fixed: provide sources, produce reasoning steps,
//! summarize every source concurrently, synthesize insights, stamp the
//! report. Capabilities are chosen once, at construction.

use super::demo::{DemoInsightSynthesizer, DemoSummarizer};
use super::output::{ResearchReport, ResearchRequest, SourceListing, SourceSummary};
use super::reasoning::{NarratedMethodology, ReasoningStepProducer, StandardMethodology};
use super::sources::{Source, SourceProvider, SyntheticSourceProvider, WebSourceProvider};
use super::summarizer::{FallbackSummarizer, LlmSummarizer, SourceSummarizer};
use super::synthesis::{FallbackInsightSynthesizer, InsightSynthesizer, LlmInsightSynthesizer};
use crate::config::InsightConfig;
use crate::error::{ConfigError, ResearchError};
use crate::providers::create_provider;
use crate::search::create_search_client;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Default cap on `max_sources` when none is configured.
pub const DEFAULT_MAX_SOURCES_LIMIT: usize = 10;

/// Which implementation backs each capability. Reported by health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMode {
    pub sources: String,
    pub summarizer: String,
    pub synthesizer: String,
    pub reasoning: String,
    pub demo_mode: bool,
}

/// Orchestrates the research pipeline over injected capabilities.
#[derive(Clone)]
pub struct ResearchEngine {
    sources: Arc<dyn SourceProvider>,
    summarizer: Arc<dyn SourceSummarizer>,
    synthesizer: Arc<dyn InsightSynthesizer>,
    reasoning: Arc<dyn ReasoningStepProducer>,
    default_max_sources: usize,
    max_sources_limit: usize,
    demo_mode: bool,
}

impl ResearchEngine {
    pub fn new(
        sources: Arc<dyn SourceProvider>,
        summarizer: Arc<dyn SourceSummarizer>,
        synthesizer: Arc<dyn InsightSynthesizer>,
        reasoning: Arc<dyn ReasoningStepProducer>,
    ) -> Self {
        Self {
            sources,
            summarizer,
            synthesizer,
            reasoning,
            default_max_sources: super::output::DEFAULT_MAX_SOURCES,
            max_sources_limit: DEFAULT_MAX_SOURCES_LIMIT,
            demo_mode: false,
        }
    }

    /// Engine with no external capabilities: synthetic sources and the
    /// deterministic fallback text.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(SyntheticSourceProvider),
            Arc::new(FallbackSummarizer),
            Arc::new(FallbackInsightSynthesizer),
            Arc::new(StandardMethodology),
        )
    }

    /// Build the engine from configuration, wiring in whichever providers
    /// have credentials.
    pub fn from_config(config: &InsightConfig) -> Result<Self, ConfigError> {
        let llm = create_provider(&config.llm)?;
        let search = create_search_client(&config.search)?;
        let demo = config.research.demo_mode && llm.is_none();

        let sources: Arc<dyn SourceProvider> = match search {
            Some(client) => Arc::new(
                WebSourceProvider::new(client).with_min_credibility(config.research.min_credibility),
            ),
            None => Arc::new(SyntheticSourceProvider),
        };

        let (summarizer, synthesizer, reasoning): (
            Arc<dyn SourceSummarizer>,
            Arc<dyn InsightSynthesizer>,
            Arc<dyn ReasoningStepProducer>,
        ) = match llm {
            Some(llm) => (
                Arc::new(LlmSummarizer::new(Arc::clone(&llm))),
                Arc::new(LlmInsightSynthesizer::new(llm)),
                Arc::new(StandardMethodology),
            ),
            None if demo => (
                Arc::new(DemoSummarizer),
                Arc::new(DemoInsightSynthesizer),
                Arc::new(NarratedMethodology),
            ),
            None => (
                Arc::new(FallbackSummarizer),
                Arc::new(FallbackInsightSynthesizer),
                Arc::new(StandardMethodology),
            ),
        };

        let engine = Self::new(sources, summarizer, synthesizer, reasoning)
            .with_limits(
                config.research.default_max_sources,
                config.research.max_sources_limit,
            )
            .with_demo_mode(demo);
        info!(mode = ?engine.mode(), "Research engine ready");
        Ok(engine)
    }

    pub fn with_limits(mut self, default_max_sources: usize, max_sources_limit: usize) -> Self {
        self.max_sources_limit = max_sources_limit.max(1);
        self.default_max_sources = default_max_sources.clamp(1, self.max_sources_limit);
        self
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn default_max_sources(&self) -> usize {
        self.default_max_sources
    }

    pub fn max_sources_limit(&self) -> usize {
        self.max_sources_limit
    }

    pub fn mode(&self) -> EngineMode {
        EngineMode {
            sources: self.sources.name().to_string(),
            summarizer: self.summarizer.name().to_string(),
            synthesizer: self.synthesizer.name().to_string(),
            reasoning: self.reasoning.name().to_string(),
            demo_mode: self.demo_mode,
        }
    }

    /// Check a topic and source count, returning the trimmed topic.
    fn validate<'a>(&self, topic: &'a str, max_sources: usize) -> Result<&'a str, ResearchError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ResearchError::invalid("topic must not be empty"));
        }
        if max_sources == 0 || max_sources > self.max_sources_limit {
            return Err(ResearchError::invalid(format!(
                "max_sources must be between 1 and {}, got {}",
                self.max_sources_limit, max_sources
            )));
        }
        Ok(topic)
    }

    pub async fn run(&self, request: &ResearchRequest) -> Result<ResearchReport, ResearchError> {
        self.assemble(&request.topic, request.max_sources).await
    }

    /// Run the full pipeline for `topic`.
    pub async fn assemble(
        &self,
        topic: &str,
        max_sources: usize,
    ) -> Result<ResearchReport, ResearchError> {
        let topic = self.validate(topic, max_sources)?;
        info!(topic, max_sources, "Starting research");

        info!("Step 1: Searching for sources");
        let sources = self.sources.provide(topic, max_sources).await?;
        if sources.is_empty() {
            warn!(topic, "Source provider returned nothing");
            return Err(ResearchError::NotFound {
                message: "No credible sources found for the topic".to_string(),
            });
        }
        info!(count = sources.len(), provider = self.sources.name(), "Found sources");

        info!("Step 2: Generating reasoning steps");
        let reasoning_steps = self.reasoning.produce(topic, &sources);

        info!("Step 3: Summarizing sources");
        let article_summaries = self.summarize_all(&sources).await?;
        if article_summaries.len() != sources.len() {
            return Err(ResearchError::internal(format!(
                "expected {} summaries, got {}",
                sources.len(),
                article_summaries.len()
            )));
        }

        info!("Step 4: Generating cross-insights");
        let insights = self.synthesizer.synthesize(topic, &article_summaries).await;

        info!("Step 5: Compiling final report");
        let report = ResearchReport {
            topic: topic.to_string(),
            timestamp: Utc::now(),
            article_summaries,
            cross_insights: insights.cross_insights,
            key_takeaways: insights.key_takeaways,
            contradictions: insights.contradictions,
            emerging_trends: insights.emerging_trends,
            reasoning_steps,
        };
        info!(
            topic,
            insights = report.cross_insights.len(),
            "Research completed"
        );
        Ok(report)
    }

    /// Summarize each source on its own task; output keeps input order.
    ///
    /// Tasks live in a `JoinSet`, so dropping this future (a request
    /// timeout, an early error) aborts every summary still in flight.
    async fn summarize_all(&self, sources: &[Source]) -> Result<Vec<SourceSummary>, ResearchError> {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.iter().cloned().enumerate() {
            let summarizer = Arc::clone(&self.summarizer);
            tasks.spawn(async move { (index, summarizer.summarize(&source).await) });
        }

        let mut slots: Vec<Option<SourceSummary>> = vec![None; sources.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, summary) = joined.map_err(|e| {
                ResearchError::internal(format!("summarization task failed: {}", e))
            })?;
            slots[index] = Some(summary);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Provider output only, without summarizing.
    pub async fn list_sources(
        &self,
        topic: &str,
        max_sources: usize,
    ) -> Result<SourceListing, ResearchError> {
        let topic = self.validate(topic, max_sources)?;
        let sources = self.sources.provide(topic, max_sources).await?;
        Ok(SourceListing {
            topic: topic.to_string(),
            sources,
        })
    }
}
