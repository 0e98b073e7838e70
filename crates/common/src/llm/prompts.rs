//! Fixed prompt templates, one per analysis task

use crate::models::Paper;

/// System and user message pair sent to the chat endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

const SUMMARIZE_SYSTEM: &str = "You are a professional academic research assistant. \
Analyze the paper concisely and cover:
1. Research topic and contribution
2. Main methods or techniques
3. Significance and impact
Keep the answer under 200 words.";

const TRENDS_SYSTEM: &str = "You are a professional academic research analyst. \
Based on the papers provided, analyze research trends and cover:
1. Main research directions
2. Hot topics
3. Predicted developments
Keep the answer concise and under 300 words.";

const RECOMMEND_SYSTEM: &str = "You are a professional academic research advisor. \
Based on the user's research interest and related papers, give advice covering:
1. Possible research directions
2. Open problems worth attention
3. Potential areas for collaboration
Keep the answer concise and under 250 words.";

/// Papers listed in a trend prompt
pub const TREND_PAPER_LIMIT: usize = 10;

/// Papers listed in a recommendation prompt
pub const RECOMMEND_PAPER_LIMIT: usize = 5;

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "none"
    } else {
        text
    }
}

/// Prompt asking for an analysis of a single paper
pub fn summarize(paper: &Paper) -> Prompt {
    let user = format!(
        "Please analyze this paper:\nTitle: {}\nAuthors: {}\nYear: {}\nCitations: {}\nAbstract: {}\nKeywords: {}",
        paper.title,
        paper.authors.join(", "),
        paper.year,
        paper.citations,
        or_none(&paper.abstract_text),
        or_none(&paper.keywords.join(", ")),
    );

    Prompt {
        system: SUMMARIZE_SYSTEM,
        user,
    }
}

/// Prompt asking for research trends over a set of papers
pub fn trends(papers: &[Paper]) -> Prompt {
    let listing = papers
        .iter()
        .take(TREND_PAPER_LIMIT)
        .map(|p| format!("- {} ({}, citations: {})", p.title, p.year, p.citations))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        system: TRENDS_SYSTEM,
        user: format!("Please analyze the research trends of the following papers:\n{}", listing),
    }
}

/// Prompt asking for research advice around a topic
pub fn recommend(query: &str, papers: &[Paper]) -> Prompt {
    let listing = papers
        .iter()
        .take(RECOMMEND_PAPER_LIMIT)
        .map(|p| format!("- {} ({})", p.title, p.year))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        system: RECOMMEND_SYSTEM,
        user: format!(
            "Research interest: {}\n\nRelated papers:\n{}\n\nPlease give research advice.",
            query, listing
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, title: &str, year: i32) -> Paper {
        Paper {
            id: id.into(),
            title: title.into(),
            authors: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            year,
            citations: 42,
            abstract_text: String::new(),
            keywords: vec![],
            venue: String::new(),
            doi: None,
            url: None,
            open_access: false,
            references: vec![],
        }
    }

    #[test]
    fn test_summarize_fills_placeholders() {
        let prompt = summarize(&paper("p1", "On Engines", 1843));
        assert!(prompt.user.contains("Title: On Engines"));
        assert!(prompt.user.contains("Authors: Ada Lovelace, Alan Turing"));
        assert!(prompt.user.contains("Abstract: none"));
        assert!(prompt.user.contains("Keywords: none"));
        assert!(prompt.system.contains("200 words"));
    }

    #[test]
    fn test_trends_lists_at_most_ten_papers() {
        let papers: Vec<_> = (0..15)
            .map(|i| paper(&i.to_string(), &format!("Paper {}", i), 2020))
            .collect();
        let prompt = trends(&papers);
        assert_eq!(prompt.user.lines().filter(|l| l.starts_with("- ")).count(), 10);
        assert!(prompt.user.contains("- Paper 0 (2020, citations: 42)"));
    }

    #[test]
    fn test_recommend_mentions_interest() {
        let papers: Vec<_> = (0..8)
            .map(|i| paper(&i.to_string(), &format!("Paper {}", i), 2021))
            .collect();
        let prompt = recommend("graph learning", &papers);
        assert!(prompt.user.starts_with("Research interest: graph learning"));
        assert_eq!(prompt.user.lines().filter(|l| l.starts_with("- ")).count(), 5);
    }
}
