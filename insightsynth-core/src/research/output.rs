//! Report data model and markdown rendering.

use super::sources::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of sources for a request that does not specify one.
pub const DEFAULT_MAX_SOURCES: usize = 3;

fn default_max_sources() -> usize {
    DEFAULT_MAX_SOURCES
}

/// Clamp a credibility estimate into `[0, 1]`; NaN becomes 0.
pub fn clamp_credibility(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Inbound request for a research report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

impl ResearchRequest {
    pub fn new(topic: impl Into<String>, max_sources: usize) -> Self {
        Self {
            topic: topic.into(),
            max_sources,
        }
    }
}

/// Structured summary of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub core_argument: String,
    pub evidence_used: String,
    pub conclusion: String,
    pub credibility_score: f64,
}

/// Confidence attached to a cross-source insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// An observation derived from comparing several summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossInsight {
    pub insight: String,
    /// URLs of the summaries backing this insight.
    pub supporting_sources: Vec<String>,
    pub confidence_level: Confidence,
}

/// Everything the insight synthesizer produces for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub cross_insights: Vec<CrossInsight>,
    pub contradictions: Vec<String>,
    pub emerging_trends: Vec<String>,
    pub key_takeaways: Vec<String>,
}

/// The assembled report returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    pub timestamp: DateTime<Utc>,
    pub article_summaries: Vec<SourceSummary>,
    pub cross_insights: Vec<CrossInsight>,
    pub key_takeaways: Vec<String>,
    pub contradictions: Vec<String>,
    pub emerging_trends: Vec<String>,
    pub reasoning_steps: Vec<String>,
}

/// Provider output for a topic, without running the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceListing {
    pub topic: String,
    pub sources: Vec<Source>,
}

/// Renders reports as markdown for terminals and files.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Pretty-printed JSON, the same shape the HTTP gateway returns.
    pub fn json<T: Serialize>(value: &T) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    pub fn markdown(report: &ResearchReport) -> String {
        let mut out = format!("# Research Report: {}\n\n", report.topic);
        out.push_str(&format!(
            "_Generated {}_\n\n",
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        out.push_str("## Methodology\n\n");
        for step in &report.reasoning_steps {
            out.push_str(&format!("{step}\n"));
        }

        out.push_str("\n## Sources\n\n");
        for (i, s) in report.article_summaries.iter().enumerate() {
            out.push_str(&format!(
                "### {}. {} (credibility: {:.0}%)\n{}\n\n",
                i + 1,
                s.title,
                s.credibility_score * 100.0,
                s.url
            ));
            out.push_str(&format!("{}\n\n", s.summary));
            out.push_str(&format!("- **Core argument:** {}\n", s.core_argument));
            out.push_str(&format!("- **Evidence:** {}\n", s.evidence_used));
            out.push_str(&format!("- **Conclusion:** {}\n\n", s.conclusion));
        }

        out.push_str("## Cross-Source Insights\n\n");
        for insight in &report.cross_insights {
            out.push_str(&format!(
                "- [{}] {} ({} source{})\n",
                insight.confidence_level,
                insight.insight,
                insight.supporting_sources.len(),
                if insight.supporting_sources.len() == 1 {
                    ""
                } else {
                    "s"
                }
            ));
        }

        Self::push_list(&mut out, "Contradictions", &report.contradictions);
        Self::push_list(&mut out, "Emerging Trends", &report.emerging_trends);
        Self::push_list(&mut out, "Key Takeaways", &report.key_takeaways);
        out
    }

    pub fn source_listing(listing: &SourceListing) -> String {
        let mut out = format!("# Sources: {}\n\n", listing.topic);
        for (i, source) in listing.sources.iter().enumerate() {
            out.push_str(&format!(
                "{}. **{}** (credibility: {:.0}%)\n   {}\n",
                i + 1,
                source.title,
                source.credibility_score * 100.0,
                source.url
            ));
        }
        out
    }

    fn push_list(out: &mut String, heading: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        out.push_str(&format!("\n## {heading}\n\n"));
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_report() -> ResearchReport {
        ResearchReport {
            topic: "soil carbon".into(),
            timestamp: Utc::now(),
            article_summaries: vec![SourceSummary {
                title: "Soil Study".into(),
                url: "https://soil.edu/a".into(),
                summary: "Carbon storage rises with cover crops.".into(),
                core_argument: "Cover crops help".into(),
                evidence_used: "Field trials".into(),
                conclusion: "Adopt cover crops".into(),
                credibility_score: 0.9,
            }],
            cross_insights: vec![CrossInsight {
                insight: "Practices matter".into(),
                supporting_sources: vec!["https://soil.edu/a".into()],
                confidence_level: Confidence::High,
            }],
            key_takeaways: vec!["Measure baselines".into()],
            contradictions: vec![],
            emerging_trends: vec!["Remote sensing".into()],
            reasoning_steps: vec!["1. Gather sources".into()],
        }
    }

    #[test]
    fn test_confidence_serializes_as_literal() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"High\"");
        assert_eq!(
            serde_json::from_str::<Confidence>("\"Low\"").unwrap(),
            Confidence::Low
        );
        assert!(serde_json::from_str::<Confidence>("\"high\"").is_err());
    }

    #[test]
    fn test_request_defaults_max_sources() {
        let req: ResearchRequest = serde_json::from_str(r#"{"topic":"x"}"#).unwrap();
        assert_eq!(req.max_sources, DEFAULT_MAX_SOURCES);
    }

    #[test]
    fn test_report_field_names() {
        let json = serde_json::to_value(make_report()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "article_summaries",
                "contradictions",
                "cross_insights",
                "emerging_trends",
                "key_takeaways",
                "reasoning_steps",
                "timestamp",
                "topic",
            ]
        );
        assert_eq!(json["cross_insights"][0]["confidence_level"], "High");
        // RFC 3339 timestamp
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_clamp_credibility() {
        assert_eq!(clamp_credibility(1.3), 1.0);
        assert_eq!(clamp_credibility(-0.2), 0.0);
        assert_eq!(clamp_credibility(0.75), 0.75);
        assert_eq!(clamp_credibility(f64::NAN), 0.0);
    }

    #[test]
    fn test_markdown_rendering() {
        let md = ReportRenderer::markdown(&make_report());
        assert!(md.starts_with("# Research Report: soil carbon"));
        assert!(md.contains("### 1. Soil Study (credibility: 90%)"));
        assert!(md.contains("- [High] Practices matter (1 source)"));
        assert!(md.contains("## Emerging Trends"));
        // Empty sections are omitted.
        assert!(!md.contains("## Contradictions"));
    }

    #[test]
    fn test_json_matches_wire_shape() {
        let report = make_report();
        let json = ReportRenderer::json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["topic"], "soil carbon");
        assert_eq!(value["article_summaries"][0]["url"], "https://soil.edu/a");
        assert!(json.contains('\n'));
    }
}
