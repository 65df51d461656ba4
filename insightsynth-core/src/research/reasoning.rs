//! Methodology steps shown alongside a report.

use super::sources::Source;

/// Produces a human-readable list of methodology steps. Descriptive only.
pub trait ReasoningStepProducer: Send + Sync {
    fn produce(&self, topic: &str, sources: &[Source]) -> Vec<String>;

    fn name(&self) -> &str;
}

/// The general six-step methodology.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMethodology;

impl ReasoningStepProducer for StandardMethodology {
    fn produce(&self, _topic: &str, _sources: &[Source]) -> Vec<String> {
        [
            "Evaluate source credibility based on domain authority and content quality",
            "Identify common themes and arguments across sources",
            "Extract key evidence and data points from each source",
            "Compare findings to identify agreements and contradictions",
            "Synthesize unique insights from cross-source analysis",
            "Formulate actionable takeaways based on synthesized findings",
        ]
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect()
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Six steps that name the topic and how many sources were found.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarratedMethodology;

impl ReasoningStepProducer for NarratedMethodology {
    fn produce(&self, topic: &str, sources: &[Source]) -> Vec<String> {
        vec![
            format!(
                "1. Identified {} credible sources related to {} from academic and research institutions",
                sources.len(),
                topic
            ),
            "2. Evaluated source credibility based on domain authority, publication quality, and citation patterns".to_string(),
            "3. Extracted key arguments and evidence from each source using structured analysis".to_string(),
            "4. Compared findings across sources to identify common themes and contradictory viewpoints".to_string(),
            "5. Synthesized cross-source insights by analyzing patterns and relationships between studies".to_string(),
            "6. Generated actionable takeaways based on the strongest evidence and consensus findings".to_string(),
        ]
    }

    fn name(&self) -> &str {
        "narrated"
    }
}
