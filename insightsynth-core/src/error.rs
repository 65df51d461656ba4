//! Error types for the InsightSynth core.
//!
//! Uses `thiserror` for public API error types. Upstream failures (`LlmError`,
//! `SearchError`) are recovered inside their components; only `ResearchError`
//! is meant to reach a caller of the pipeline.

/// Top-level error type for the InsightSynth core library.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Research error: {0}")]
    Research(#[from] ResearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the text-generation capability.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider returned an empty completion")]
    EmptyResponse,
}

/// Errors from the web search capability.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request failed: {message}")]
    Request { message: String },

    #[error("Search API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Search response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported {kind} provider: {name}")]
    UnsupportedProvider { kind: String, name: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors surfaced by the report pipeline to its caller.
///
/// These are the only classes a boundary (HTTP, CLI) ever has to map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResearchError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Research failed: {message}")]
    Internal { message: String },
}

impl ResearchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code for this error class.
    pub fn status_code(&self) -> u16 {
        match self {
            ResearchError::InvalidRequest { .. } => 400,
            ResearchError::NotFound { .. } => 404,
            ResearchError::Internal { .. } => 500,
        }
    }
}

/// A type alias for results using the top-level `InsightError`.
pub type Result<T> = std::result::Result<T, InsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_llm() {
        let err = InsightError::Llm(LlmError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "LLM error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_search() {
        let err = InsightError::Search(SearchError::Http {
            status: 432,
            body: "plan limit exceeded".into(),
        });
        assert_eq!(
            err.to_string(),
            "Search error: Search API returned HTTP 432: plan limit exceeded"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = InsightError::Config(ConfigError::UnsupportedProvider {
            kind: "search".into(),
            name: "bing".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Unsupported search provider: bing"
        );
    }

    #[test]
    fn test_research_error_messages() {
        let err = ResearchError::NotFound {
            message: "No credible sources found for the topic".into(),
        };
        assert_eq!(err.to_string(), "No credible sources found for the topic");

        let err = ResearchError::internal("summarization task panicked");
        assert_eq!(
            err.to_string(),
            "Research failed: summarization task panicked"
        );
    }

    #[test]
    fn test_research_error_status_codes() {
        assert_eq!(ResearchError::invalid("x").status_code(), 400);
        assert_eq!(
            ResearchError::NotFound {
                message: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(ResearchError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InsightError = io_err.into();
        assert!(matches!(err, InsightError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: InsightError = serde_err.into();
        assert!(matches!(err, InsightError::Serialization(_)));
    }

    #[test]
    fn test_llm_error_variants() {
        let err = LlmError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "Rate limited by provider, retry after 60s");
        assert_eq!(
            LlmError::EmptyResponse.to_string(),
            "Provider returned an empty completion"
        );
    }
}
