//! Offline research analytics over a set of papers
//!
//! Provides:
//! - Keyword trend classification
//! - Keyword clustering with growth estimates
//! - Collaborator recommendation from shared keywords
//! - A heuristic summary used when no LLM credential is available

mod clusters;
mod collaborators;
mod trends;

pub use clusters::{keyword_clusters, KeywordCluster};
pub use collaborators::{
    profile_authors, recommend_collaborators, AuthorProfile, AuthorSummary, Recommendation,
};
pub use trends::{analyze_trends, TrendAnalysis, TrendKind};

use crate::models::Paper;

/// Characters of abstract kept by the heuristic summary
const SUMMARY_ABSTRACT_CHARS: usize = 100;

/// Round half toward positive infinity, matching the growth figures the UI
/// has always displayed.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Summarize a paper without calling a model
pub fn heuristic_summary(paper: &Paper) -> String {
    let topics = paper
        .keywords
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let excerpt: String = paper.abstract_text.chars().take(SUMMARY_ABSTRACT_CHARS).collect();

    format!("This paper studies {}. {}...", topics, excerpt)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::Paper;

    pub fn paper(id: &str, year: i32, keywords: &[&str]) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {}", id),
            authors: vec![],
            year,
            citations: 100,
            abstract_text: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            venue: String::new(),
            doi: None,
            url: None,
            open_access: false,
            references: vec![],
        }
    }
}
