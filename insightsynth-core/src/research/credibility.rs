//! Heuristic credibility scoring for search hits.
//!
//! Scores start at 0.5 and gain points for institutional hosts, preprint and
//! biomedical indexes, research vocabulary, and long-form content.

use super::output::clamp_credibility;
use super::sources::Source;
use crate::search::SearchHit;

/// Default minimum score a hit needs to survive ranking.
pub const DEFAULT_MIN_CREDIBILITY: f64 = 0.6;

const BASE_SCORE: f64 = 0.5;
const INSTITUTIONAL_LABELS: &[&str] = &["edu", "gov", "org"];
const COMMERCIAL_LABELS: &[&str] = &["com", "net"];
const CONTENT_KEYWORDS: &[&str] = &["study", "research", "analysis", "data"];
const TITLE_KEYWORDS: &[&str] = &["study", "research", "analysis"];
const LONG_CONTENT_CHARS: usize = 500;

/// Host facts the scorer cares about.
#[derive(Debug, Default, PartialEq, Eq)]
struct HostTraits {
    institutional: bool,
    index: bool,
    commercial: bool,
}

impl HostTraits {
    fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        match url::Url::parse(&lower)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        {
            Some(host) => {
                let labels: Vec<&str> = host.split('.').collect();
                let has_label = |set: &[&str]| labels.iter().any(|l| set.contains(l));
                Self {
                    institutional: has_label(INSTITUTIONAL_LABELS),
                    index: host == "arxiv.org"
                        || host.ends_with(".arxiv.org")
                        || host.contains("pubmed"),
                    commercial: has_label(COMMERCIAL_LABELS),
                }
            }
            // Not an absolute URL; look for the suffixes anywhere in the text.
            None => Self {
                institutional: INSTITUTIONAL_LABELS
                    .iter()
                    .any(|l| lower.contains(&format!(".{l}"))),
                index: lower.contains("arxiv.org") || lower.contains("pubmed"),
                commercial: COMMERCIAL_LABELS
                    .iter()
                    .any(|l| lower.contains(&format!(".{l}"))),
            },
        }
    }
}

/// Score a single hit. The result is always within `[0, 1]`.
pub fn credibility_score(hit: &SearchHit) -> f64 {
    let host = HostTraits::from_url(&hit.url);
    let title = hit.title.to_lowercase();
    let content = hit.content.to_lowercase();

    let mut score = BASE_SCORE;
    if host.institutional {
        score += 0.3;
    }
    if host.index {
        score += 0.2;
    }
    if host.commercial {
        score += 0.1;
    }
    if CONTENT_KEYWORDS.iter().any(|w| content.contains(w)) {
        score += 0.1;
    }
    if TITLE_KEYWORDS.iter().any(|w| title.contains(w)) {
        score += 0.1;
    }
    if hit.content.chars().count() > LONG_CONTENT_CHARS {
        score += 0.1;
    }
    clamp_credibility(score)
}

/// Score, filter and order raw hits.
///
/// Hits scoring below `min_score` are dropped; the rest are sorted by score,
/// highest first, keeping input order among equals, and cut to `max_results`.
pub fn rank_sources(hits: Vec<SearchHit>, min_score: f64, max_results: usize) -> Vec<Source> {
    let mut ranked: Vec<Source> = hits
        .into_iter()
        .filter_map(|hit| {
            let score = credibility_score(&hit);
            (score >= min_score).then(|| Source::new(hit.title, hit.url, hit.content, score))
        })
        .collect();
    ranked.sort_by(|a, b| b.credibility_score.total_cmp(&a.credibility_score));
    ranked.truncate(max_results);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str, content: &str) -> SearchHit {
        SearchHit::new(title, url, content)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bare_commercial_host() {
        let score = credibility_score(&hit("Opinion", "https://blog.example.com/post", "words"));
        assert!(approx(score, 0.6));
    }

    #[test]
    fn test_institutional_with_keywords() {
        let score = credibility_score(&hit(
            "A Study of Soil",
            "https://agri.state.edu/paper",
            "research data",
        ));
        // 0.5 + 0.3 + 0.1 + 0.1
        assert!(approx(score, 1.0));
    }

    #[test]
    fn test_arxiv_scores_index_and_institutional() {
        let score = credibility_score(&hit("Preprint", "https://arxiv.org/abs/2401.00001", ""));
        // org label plus index bonus
        assert!(approx(score, 1.0));
    }

    #[test]
    fn test_pubmed_host() {
        let traits = HostTraits::from_url("https://pubmed.ncbi.nlm.nih.gov/123/");
        assert!(traits.index);
        assert!(traits.institutional);
        assert!(!traits.commercial);
    }

    #[test]
    fn test_label_match_not_substring() {
        // ".edu" appears in the text but not as a host label.
        let traits = HostTraits::from_url("https://www.education.com/topic");
        assert!(!traits.institutional);
        assert!(traits.commercial);
    }

    #[test]
    fn test_unparseable_url_uses_substrings() {
        let traits = HostTraits::from_url("library.mit.edu/catalog");
        assert!(traits.institutional);
    }

    #[test]
    fn test_long_content_bonus() {
        let long = "x".repeat(501);
        let short = "x".repeat(500);
        let a = credibility_score(&hit("t", "https://site.io/a", &long));
        let b = credibility_score(&hit("t", "https://site.io/a", &short));
        assert!(approx(a - b, 0.1));
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let score = credibility_score(&hit("RESEARCH notes", "https://site.io/a", "DATA"));
        assert!(approx(score, 0.7));
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let hits = vec![
            hit("Notes", "https://site.io/a", ""),                 // 0.5, dropped
            hit("Blog", "https://blog.example.com/b", ""),         // 0.6
            hit("Report", "https://agency.gov/c", "data"),         // 0.9
            hit("Other blog", "https://news.example.net/d", ""),   // 0.6
        ];
        let ranked = rank_sources(hits, DEFAULT_MIN_CREDIBILITY, 10);
        let urls: Vec<&str> = ranked.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://agency.gov/c",
                "https://blog.example.com/b",
                "https://news.example.net/d",
            ]
        );
    }

    #[test]
    fn test_rank_truncates() {
        let hits = (0..6)
            .map(|i| hit("Study", &format!("https://u{i}.edu/x"), ""))
            .collect();
        assert_eq!(rank_sources(hits, DEFAULT_MIN_CREDIBILITY, 3).len(), 3);
    }
}
