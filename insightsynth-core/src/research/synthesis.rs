//! Cross-source insight synthesis.
//!
//! Compares all summaries for a topic and produces cross-insights,
//! contradictions, emerging trends and key takeaways.

use super::output::{Confidence, CrossInsight, InsightBundle, SourceSummary};
use crate::brain::LlmProvider;
use crate::types::CompletionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const TITLE_MATCH_CHARS: usize = 20;

const SYNTHESIS_SYSTEM_PROMPT: &str = "You are an expert research synthesizer. Your task is \
to analyze multiple research summaries and extract meaningful cross-insights.

Generate:
1. 3-5 unique actionable insights that emerge from comparing sources
2. Any contradictions between sources
3. Emerging trends or patterns
4. Key takeaways for practical application

Be specific, actionable, and evidence-based. Avoid generic statements.";

/// Derives cross-source insights from a set of summaries. Never fails.
#[async_trait]
pub trait InsightSynthesizer: Send + Sync {
    async fn synthesize(&self, topic: &str, summaries: &[SourceSummary]) -> InsightBundle;

    fn name(&self) -> &str;
}

/// URLs of the first two summaries, the default attribution.
pub(crate) fn leading_urls(summaries: &[SourceSummary]) -> Vec<String> {
    summaries.iter().take(2).map(|s| s.url.clone()).collect()
}

/// The generic bundle used when no analysis is available.
pub fn fallback_insights(summaries: &[SourceSummary]) -> InsightBundle {
    InsightBundle {
        cross_insights: vec![
            CrossInsight {
                insight: format!(
                    "Analysis of {} sources reveals common themes in the research area.",
                    summaries.len()
                ),
                supporting_sources: summaries.iter().map(|s| s.url.clone()).collect(),
                confidence_level: Confidence::Medium,
            },
            CrossInsight {
                insight: "Multiple sources provide complementary perspectives on the topic."
                    .to_string(),
                supporting_sources: leading_urls(summaries),
                confidence_level: Confidence::Medium,
            },
        ],
        contradictions: vec!["Detailed analysis unavailable due to processing limitations.".into()],
        emerging_trends: vec!["Trend analysis unavailable due to processing limitations.".into()],
        key_takeaways: vec![
            "Further research is needed to fully understand the topic.".into(),
            "Multiple perspectives exist in the current literature.".into(),
            "Consider consulting additional sources for comprehensive understanding.".into(),
        ],
    }
}

/// Synthesizer used when no text-generation capability is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackInsightSynthesizer;

#[async_trait]
impl InsightSynthesizer for FallbackInsightSynthesizer {
    async fn synthesize(&self, _topic: &str, summaries: &[SourceSummary]) -> InsightBundle {
        fallback_insights(summaries)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Confidence implied by the wording of an insight line.
pub fn confidence_from_text(line: &str) -> Confidence {
    let lower = line.to_lowercase();
    if lower.contains("high confidence") || lower.contains("strongly") {
        Confidence::High
    } else if lower.contains("low confidence") || lower.contains("uncertain") {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}

/// Build a cross-insight from one bullet.
///
/// A summary supports the insight when the line mentions `source N`
/// (1-indexed) or the first 20 characters of its title. With no match the
/// first two summaries are credited.
pub fn parse_insight_line(line: &str, summaries: &[SourceSummary]) -> CrossInsight {
    let lower = line.to_lowercase();
    let mut supporting: Vec<String> = summaries
        .iter()
        .enumerate()
        .filter(|(i, summary)| {
            let title: String = summary
                .title
                .to_lowercase()
                .chars()
                .take(TITLE_MATCH_CHARS)
                .collect();
            lower.contains(&format!("source {}", i + 1)) || lower.contains(&title)
        })
        .map(|(_, summary)| summary.url.clone())
        .collect();

    if supporting.is_empty() {
        supporting = leading_urls(summaries);
    }

    CrossInsight {
        insight: line.to_string(),
        supporting_sources: supporting,
        confidence_level: confidence_from_text(line),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    CrossInsights,
    Contradictions,
    EmergingTrends,
    KeyTakeaways,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        let upper = line.to_uppercase();
        if upper.contains("CROSS-INSIGHTS") {
            Some(Section::CrossInsights)
        } else if upper.contains("CONTRADICTIONS") {
            Some(Section::Contradictions)
        } else if upper.contains("EMERGING TRENDS") {
            Some(Section::EmergingTrends)
        } else if upper.contains("KEY TAKEAWAYS") {
            Some(Section::KeyTakeaways)
        } else {
            None
        }
    }
}

/// Split a free-text analysis into its four sections.
///
/// Only `-` bullets inside a recognised section are kept.
pub fn parse_insights_response(response: &str, summaries: &[SourceSummary]) -> InsightBundle {
    let mut bundle = InsightBundle::default();
    let mut section: Option<Section> = None;

    for line in response.lines().map(str::trim) {
        if let Some(header) = Section::from_header(line) {
            section = Some(header);
            continue;
        }
        let (Some(current), Some(rest)) = (section, line.strip_prefix('-')) else {
            continue;
        };
        let content = rest.trim();
        if content.is_empty() {
            continue;
        }
        match current {
            Section::CrossInsights => bundle
                .cross_insights
                .push(parse_insight_line(content, summaries)),
            Section::Contradictions => bundle.contradictions.push(content.to_string()),
            Section::EmergingTrends => bundle.emerging_trends.push(content.to_string()),
            Section::KeyTakeaways => bundle.key_takeaways.push(content.to_string()),
        }
    }
    bundle
}

/// Numbered block describing each summary, as fed to the model.
fn format_summaries(summaries: &[SourceSummary]) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "Source {}: {}\nURL: {}\nSummary: {}\nCore Argument: {}\nEvidence: {}\n\
                 Conclusion: {}\nCredibility: {:.2}\n",
                i + 1,
                s.title,
                s.url,
                s.summary,
                s.core_argument,
                s.evidence_used,
                s.conclusion,
                s.credibility_score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Synthesizer backed by a text-generation provider.
pub struct LlmInsightSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmInsightSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    fn build_prompt(topic: &str, summaries: &[SourceSummary]) -> String {
        format!(
            "Topic: {topic}\n\n\
             Research Summaries:\n{}\n\
             Analyze these summaries and provide:\n\n\
             CROSS-INSIGHTS (3-5 actionable insights):\n\
             - [Insight 1 with supporting evidence]\n\
             - [Insight 2 with supporting evidence]\n\n\
             CONTRADICTIONS:\n\
             - [Any conflicting findings between sources]\n\n\
             EMERGING TRENDS:\n\
             - [Patterns or trends identified across sources]\n\n\
             KEY TAKEAWAYS:\n\
             - [3-5 practical, actionable takeaways]\n\n\
             For each insight, specify which sources support it (as \"Source N\") and \
             assign a confidence level (High/Medium/Low).\n",
            format_summaries(summaries)
        )
    }
}

#[async_trait]
impl InsightSynthesizer for LlmInsightSynthesizer {
    async fn synthesize(&self, topic: &str, summaries: &[SourceSummary]) -> InsightBundle {
        let request =
            CompletionRequest::prompt(SYNTHESIS_SYSTEM_PROMPT, Self::build_prompt(topic, summaries));
        debug!(topic, count = summaries.len(), "Requesting cross-source analysis");

        match self.llm.complete_text(request).await {
            Ok(text) => {
                let bundle = parse_insights_response(&text, summaries);
                if bundle.cross_insights.is_empty() {
                    warn!(topic, "Analysis had no cross-insights, using fallback");
                    fallback_insights(summaries)
                } else {
                    bundle
                }
            }
            Err(e) => {
                warn!(topic, error = %e, "Insight synthesis failed, using fallback");
                fallback_insights(summaries)
            }
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use pretty_assertions::assert_eq;

    fn summary(title: &str, url: &str) -> SourceSummary {
        SourceSummary {
            title: title.into(),
            url: url.into(),
            summary: "s".into(),
            core_argument: "a".into(),
            evidence_used: "e".into(),
            conclusion: "c".into(),
            credibility_score: 0.8,
        }
    }

    fn summaries() -> Vec<SourceSummary> {
        vec![
            summary("Grid Storage Economics", "https://a.edu/1"),
            summary("Battery Chemistry Advances", "https://b.org/2"),
            summary("Policy Incentives Review", "https://c.gov/3"),
        ]
    }

    const ANALYSIS: &str = "\
CROSS-INSIGHTS (3-5 actionable insights):
- Source 1 strongly supports falling storage costs
- Battery chemistry advances appear in several places, low confidence
- A general observation

Contradictions:
- Source 2 and Source 3 disagree on timelines

EMERGING TRENDS:
- Sodium-ion chemistries
not a bullet

KEY TAKEAWAYS:
- Track cell prices
-
";

    #[test]
    fn test_fallback_bundle() {
        let bundle = fallback_insights(&summaries());
        assert_eq!(bundle.cross_insights.len(), 2);
        assert_eq!(
            bundle.cross_insights[0].insight,
            "Analysis of 3 sources reveals common themes in the research area."
        );
        assert_eq!(bundle.cross_insights[0].supporting_sources.len(), 3);
        assert_eq!(
            bundle.cross_insights[1].supporting_sources,
            vec!["https://a.edu/1", "https://b.org/2"]
        );
        assert!(
            bundle
                .cross_insights
                .iter()
                .all(|c| c.confidence_level == Confidence::Medium)
        );
        assert_eq!(bundle.key_takeaways.len(), 3);
    }

    #[test]
    fn test_fallback_with_single_summary() {
        let one = vec![summary("Only", "https://only.edu")];
        let bundle = fallback_insights(&one);
        assert_eq!(bundle.cross_insights[1].supporting_sources, vec!["https://only.edu"]);
    }

    #[test]
    fn test_confidence_keywords() {
        assert_eq!(confidence_from_text("STRONGLY agreed"), Confidence::High);
        assert_eq!(confidence_from_text("with high confidence"), Confidence::High);
        assert_eq!(confidence_from_text("this is uncertain"), Confidence::Low);
        assert_eq!(confidence_from_text("Low confidence here"), Confidence::Low);
        assert_eq!(confidence_from_text("plain"), Confidence::Medium);
        // High is checked first.
        assert_eq!(
            confidence_from_text("strongly suggested but uncertain"),
            Confidence::High
        );
    }

    #[test]
    fn test_insight_line_attribution() {
        let s = summaries();
        let insight = parse_insight_line("Source 3 shows incentives matter", &s);
        assert_eq!(insight.supporting_sources, vec!["https://c.gov/3"]);

        let insight = parse_insight_line("grid storage economics drive adoption", &s);
        assert_eq!(insight.supporting_sources, vec!["https://a.edu/1"]);

        let insight = parse_insight_line("nothing specific", &s);
        assert_eq!(
            insight.supporting_sources,
            vec!["https://a.edu/1", "https://b.org/2"]
        );
    }

    #[test]
    fn test_parse_sections() {
        let bundle = parse_insights_response(ANALYSIS, &summaries());
        assert_eq!(bundle.cross_insights.len(), 3);
        assert_eq!(bundle.cross_insights[0].confidence_level, Confidence::High);
        assert_eq!(
            bundle.cross_insights[0].supporting_sources,
            vec!["https://a.edu/1"]
        );
        assert_eq!(bundle.cross_insights[1].confidence_level, Confidence::Low);
        assert_eq!(
            bundle.cross_insights[1].supporting_sources,
            vec!["https://b.org/2"]
        );
        assert_eq!(
            bundle.contradictions,
            vec!["Source 2 and Source 3 disagree on timelines"]
        );
        assert_eq!(bundle.emerging_trends, vec!["Sodium-ion chemistries"]);
        assert_eq!(bundle.key_takeaways, vec!["Track cell prices"]);
    }

    #[test]
    fn test_bullets_before_any_header_are_dropped() {
        let bundle = parse_insights_response("- stray\nKEY TAKEAWAYS\n- kept", &summaries());
        assert!(bundle.cross_insights.is_empty());
        assert_eq!(bundle.key_takeaways, vec!["kept"]);
    }

    #[test]
    fn test_prompt_lists_sources() {
        let prompt = LlmInsightSynthesizer::build_prompt("energy storage", &summaries());
        assert!(prompt.contains("Topic: energy storage"));
        assert!(prompt.contains("Source 2: Battery Chemistry Advances"));
        assert!(prompt.contains("Credibility: 0.80"));
    }

    #[tokio::test]
    async fn test_llm_synthesizer_uses_parsed_bundle() {
        let llm = Arc::new(MockLlmProvider::with_response(ANALYSIS));
        let bundle = LlmInsightSynthesizer::new(llm)
            .synthesize("energy storage", &summaries())
            .await;
        assert_eq!(bundle.cross_insights.len(), 3);
    }

    #[tokio::test]
    async fn test_llm_synthesizer_falls_back_without_cross_insights() {
        let llm = Arc::new(MockLlmProvider::with_response("KEY TAKEAWAYS:\n- one"));
        let bundle = LlmInsightSynthesizer::new(llm)
            .synthesize("energy storage", &summaries())
            .await;
        assert_eq!(bundle, fallback_insights(&summaries()));
    }

    #[tokio::test]
    async fn test_llm_synthesizer_falls_back_on_error() {
        let bundle = LlmInsightSynthesizer::new(Arc::new(MockLlmProvider::failing()))
            .synthesize("energy storage", &summaries())
            .await;
        assert_eq!(bundle, fallback_insights(&summaries()));
    }
}
