//! Research pipeline.
//!
//! A report is assembled in five steps:
//! 1. **Sources**: a `SourceProvider` returns candidate sources
//! 2. **Reasoning**: a `ReasoningStepProducer` describes the method
//! 3. **Summaries**: a `SourceSummarizer` runs once per source, concurrently
//! 4. **Insights**: an `InsightSynthesizer` compares all summaries
//! 5. **Report**: the engine stamps and returns a `ResearchReport`
//!
//! Each capability has a text-generation backed implementation and a
//! deterministic fallback that needs no credentials.

pub mod credibility;
pub mod demo;
pub mod engine;
pub mod output;
pub mod reasoning;
pub mod sources;
pub mod summarizer;
pub mod synthesis;

pub use credibility::{credibility_score, rank_sources};
pub use engine::{EngineMode, ResearchEngine};
pub use output::{
    Confidence, CrossInsight, InsightBundle, ReportRenderer, ResearchReport, ResearchRequest,
    SourceListing, SourceSummary,
};
pub use reasoning::ReasoningStepProducer;
pub use sources::{Source, SourceProvider, SyntheticSourceProvider, WebSourceProvider};
pub use summarizer::SourceSummarizer;
pub use synthesis::InsightSynthesizer;
