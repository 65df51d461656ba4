//! Per-source summarization.

use super::output::SourceSummary;
use super::sources::Source;
use crate::brain::LlmProvider;
use crate::types::CompletionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const CONTENT_PROMPT_CHARS: usize = 2000;
const FALLBACK_EXCERPT_CHARS: usize = 300;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert research analyst. Your task is to \
analyze and summarize research sources with precision and clarity.

For each source, provide:
1. A concise summary (under 100 words)
2. The core argument or finding
3. Key data or evidence used
4. Author's main conclusion or implication

Be factual, avoid speculation, and focus on verifiable information.";

/// Turns one source into a structured summary. Never fails.
#[async_trait]
pub trait SourceSummarizer: Send + Sync {
    async fn summarize(&self, source: &Source) -> SourceSummary;

    fn name(&self) -> &str;
}

/// First `n` characters of `text`, on a char boundary.
pub(crate) fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The degraded summary used whenever structured analysis is unavailable.
pub fn fallback_summary(source: &Source) -> SourceSummary {
    SourceSummary {
        title: source.title.clone(),
        url: source.url.clone(),
        summary: format!(
            "Source discusses {}. {}...",
            source.title,
            char_prefix(&source.content, FALLBACK_EXCERPT_CHARS)
        ),
        core_argument: "Analysis unavailable due to processing error.".to_string(),
        evidence_used: "Evidence details unavailable.".to_string(),
        conclusion: "Conclusion unavailable.".to_string(),
        credibility_score: source.credibility_score,
    }
}

/// Summarizer used when no text-generation capability is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSummarizer;

#[async_trait]
impl SourceSummarizer for FallbackSummarizer {
    async fn summarize(&self, source: &Source) -> SourceSummary {
        fallback_summary(source)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[derive(Clone, Copy)]
enum Field {
    Summary,
    CoreArgument,
    EvidenceUsed,
    Conclusion,
}

const FIELD_MARKERS: &[(&str, Field)] = &[
    ("- Summary:", Field::Summary),
    ("- Core Argument:", Field::CoreArgument),
    ("- Evidence Used:", Field::EvidenceUsed),
    ("- Conclusion:", Field::Conclusion),
];

/// Parse a `- Summary: / - Core Argument: / - Evidence Used: / - Conclusion:`
/// response. Lines not starting with `-` continue the current field.
///
/// Returns `None` unless all four fields are non-empty.
pub fn parse_summary_response(response: &str, source: &Source) -> Option<SourceSummary> {
    let mut fields: [String; 4] = Default::default();
    let mut current: Option<Field> = None;

    for line in response.lines().map(str::trim) {
        if let Some((marker, field)) = FIELD_MARKERS.iter().find(|(m, _)| line.starts_with(m)) {
            current = Some(*field);
            fields[*field as usize] = line[marker.len()..].trim().to_string();
        } else if let Some(field) = current {
            if !line.is_empty() && !line.starts_with('-') {
                let slot = &mut fields[field as usize];
                if !slot.is_empty() {
                    slot.push(' ');
                }
                slot.push_str(line);
            }
        }
    }

    if fields.iter().any(|f| f.is_empty()) {
        return None;
    }
    let [summary, core_argument, evidence_used, conclusion] = fields;
    Some(SourceSummary {
        title: source.title.clone(),
        url: source.url.clone(),
        summary,
        core_argument,
        evidence_used,
        conclusion,
        credibility_score: source.credibility_score,
    })
}

/// Summarizer backed by a text-generation provider.
pub struct LlmSummarizer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    fn build_prompt(source: &Source) -> String {
        format!(
            "Analyze this research source:\n\n\
             Title: {}\n\
             URL: {}\n\
             Content: {}...\n\n\
             Provide a structured analysis following the format:\n\
             - Summary: [under 100 words]\n\
             - Core Argument: [main finding or thesis]\n\
             - Evidence Used: [data, methodology, or supporting information]\n\
             - Conclusion: [author's main implication or takeaway]\n",
            source.title,
            source.url,
            char_prefix(&source.content, CONTENT_PROMPT_CHARS)
        )
    }
}

#[async_trait]
impl SourceSummarizer for LlmSummarizer {
    async fn summarize(&self, source: &Source) -> SourceSummary {
        let request = CompletionRequest::prompt(SUMMARY_SYSTEM_PROMPT, Self::build_prompt(source));
        debug!(url = %source.url, model = self.llm.model_name(), "Summarizing source");

        match self.llm.complete_text(request).await {
            Ok(text) => parse_summary_response(&text, source).unwrap_or_else(|| {
                warn!(url = %source.url, "Summary response missing fields, using fallback");
                fallback_summary(source)
            }),
            Err(e) => {
                warn!(url = %source.url, error = %e, "Summarization failed, using fallback");
                fallback_summary(source)
            }
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}
