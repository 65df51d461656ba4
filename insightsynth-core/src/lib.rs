//! # InsightSynth Core
//!
//! Core library for the InsightSynth research synthesizer.
//! Provides the research pipeline, the text-generation and search clients,
//! configuration, error types, and the HTTP gateway.

pub mod brain;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod research;
pub mod search;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use config::{InsightConfig, LlmConfig, ResearchConfig, SearchConfig, load_config};
pub use error::{ConfigError, InsightError, LlmError, ResearchError, Result, SearchError};
pub use gateway::ServerConfig;
pub use research::{
    Confidence, CrossInsight, ReportRenderer, ResearchEngine, ResearchReport, ResearchRequest,
    Source, SourceListing, SourceSummary,
};
pub use types::{CompletionRequest, CompletionResponse, Message, Role};
