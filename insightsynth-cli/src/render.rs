//! Terminal rendering for reports and source listings.

use insightsynth_core::{ReportRenderer, ResearchReport, SourceListing};
use textwrap::{Options, fill};

/// How command output is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Wrapped plain text
    Text,
    /// Pretty-printed JSON
    Json,
    /// Markdown document
    Markdown,
}

const MAX_WIDTH: usize = 100;

/// Terminal width, capped so long paragraphs stay readable.
pub fn output_width() -> usize {
    textwrap::termwidth().min(MAX_WIDTH)
}

fn bullet(text: &str, width: usize) -> String {
    fill(
        text,
        Options::new(width)
            .initial_indent("  - ")
            .subsequent_indent("    "),
    )
}

fn indented(text: &str, width: usize) -> String {
    fill(
        text,
        Options::new(width)
            .initial_indent("    ")
            .subsequent_indent("    "),
    )
}

fn section(out: &mut Vec<String>, heading: &str, items: &[String], width: usize) {
    if items.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(heading.to_string());
    out.extend(items.iter().map(|item| bullet(item, width)));
}

pub fn report_text(report: &ResearchReport, width: usize) -> String {
    let mut out = vec![
        format!("Research report: {}", report.topic),
        format!("Generated {}", report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        "Methodology".to_string(),
    ];
    out.extend(report.reasoning_steps.iter().map(|s| indented(s, width)));

    out.push(String::new());
    out.push(format!("Sources ({})", report.article_summaries.len()));
    for (i, s) in report.article_summaries.iter().enumerate() {
        out.push(format!(
            "  {}. {} [{:.0}%]",
            i + 1,
            s.title,
            s.credibility_score * 100.0
        ));
        out.push(format!("     {}", s.url));
        out.push(indented(&s.summary, width));
        out.push(indented(&format!("Argument: {}", s.core_argument), width));
        out.push(indented(&format!("Evidence: {}", s.evidence_used), width));
        out.push(indented(&format!("Conclusion: {}", s.conclusion), width));
    }

    let insights: Vec<String> = report
        .cross_insights
        .iter()
        .map(|c| format!("[{}] {}", c.confidence_level, c.insight))
        .collect();
    section(&mut out, "Cross-source insights", &insights, width);
    section(&mut out, "Contradictions", &report.contradictions, width);
    section(&mut out, "Emerging trends", &report.emerging_trends, width);
    section(&mut out, "Key takeaways", &report.key_takeaways, width);
    out.join("\n")
}

pub fn listing_text(listing: &SourceListing, width: usize) -> String {
    let mut out = vec![format!("Sources for: {}", listing.topic)];
    for (i, s) in listing.sources.iter().enumerate() {
        out.push(format!(
            "  {}. {} [{:.0}%]",
            i + 1,
            s.title,
            s.credibility_score * 100.0
        ));
        out.push(format!("     {}", s.url));
        if !s.content.is_empty() {
            out.push(indented(&s.content, width));
        }
    }
    out.join("\n")
}

pub fn render_report(report: &ResearchReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => report_text(report, output_width()),
        OutputFormat::Json => ReportRenderer::json(report)?,
        OutputFormat::Markdown => ReportRenderer::markdown(report),
    })
}

pub fn render_listing(listing: &SourceListing, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => listing_text(listing, output_width()),
        OutputFormat::Json => ReportRenderer::json(listing)?,
        OutputFormat::Markdown => ReportRenderer::source_listing(listing),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightsynth_core::ResearchEngine;

    #[test]
    fn test_output_width_is_capped() {
        let width = output_width();
        assert!(width > 0);
        assert!(width <= MAX_WIDTH);
    }

    #[tokio::test]
    async fn test_report_text_sections() {
        let report = ResearchEngine::offline()
            .assemble("urban heat islands", 2)
            .await
            .unwrap();
        let text = report_text(&report, 60);
        assert!(text.starts_with("Research report: urban heat islands"));
        assert!(text.contains("Sources (2)"));
        assert!(text.contains("Research Study on urban heat islands [90%]"));
        assert!(text.contains("Key takeaways"));
        assert!(text.lines().all(|line| line.chars().count() <= 60 || line.contains("://")));
    }

    #[tokio::test]
    async fn test_listing_formats() {
        let listing = ResearchEngine::offline()
            .list_sources("urban heat islands", 1)
            .await
            .unwrap();
        let json = render_listing(&listing, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sources"].as_array().unwrap().len(), 1);

        let md = render_listing(&listing, OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# Sources: urban heat islands"));

        let text = listing_text(&listing, 80);
        assert!(text.contains("https://example-university.edu/research/urban-heat-islands"));
    }
}
