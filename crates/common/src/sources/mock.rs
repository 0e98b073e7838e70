//! Built-in paper catalogue

use super::{PaperSource, SourcePage};
use crate::errors::Result;
use crate::models::Paper;
use async_trait::async_trait;

const CATALOGUE: &str = include_str!("catalogue.json");

/// In-memory source over a fixed set of landmark papers.
///
/// Matching is a case-insensitive substring test on title, abstract,
/// keywords and author names. A query with no match returns the whole
/// catalogue, so the UI always has something to render.
pub struct MockSource {
    papers: Vec<Paper>,
}

impl MockSource {
    /// Load the built-in catalogue
    pub fn new() -> Result<Self> {
        let papers: Vec<Paper> = serde_json::from_str(CATALOGUE)?;
        Ok(Self { papers })
    }

    fn matches(paper: &Paper, needle: &str) -> bool {
        paper.title.to_lowercase().contains(needle)
            || paper.abstract_text.to_lowercase().contains(needle)
            || paper.keywords.iter().any(|k| k.to_lowercase().contains(needle))
            || paper.authors.iter().any(|a| a.to_lowercase().contains(needle))
    }
}

#[async_trait]
impl PaperSource for MockSource {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SourcePage> {
        let needle = query.trim().to_lowercase();

        let matched: Vec<&Paper> = self
            .papers
            .iter()
            .filter(|p| Self::matches(p, &needle))
            .collect();

        let results: Vec<&Paper> = if matched.is_empty() {
            self.papers.iter().collect()
        } else {
            matched
        };

        let start = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
        let papers = results
            .iter()
            .skip(start)
            .take(page_size as usize)
            .map(|p| (*p).clone())
            .collect();

        Ok(SourcePage {
            papers,
            total: results.len() as u64,
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<Paper>> {
        Ok(self.papers.iter().find(|p| p.id == id).cloned())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
