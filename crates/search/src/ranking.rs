//! Filtering and ordering of retrieved papers

use crate::request::{SearchFilters, SortMode};
use scholarnexus_common::models::Paper;

/// Drop papers outside the filter bounds, keeping order
pub fn apply_filters(papers: Vec<Paper>, filters: &SearchFilters) -> Vec<Paper> {
    if filters.is_empty() {
        return papers;
    }

    papers
        .into_iter()
        .filter(|p| filters.year_from.map_or(true, |from| p.year >= from))
        .filter(|p| filters.year_to.map_or(true, |to| p.year <= to))
        .filter(|p| filters.min_citations.map_or(true, |min| p.citations >= min))
        .filter(|p| !filters.open_access || p.open_access)
        .collect()
}

/// Order papers in place, descending; ties keep their retrieval order
pub fn sort_papers(papers: &mut [Paper], mode: SortMode) {
    match mode {
        SortMode::Citations => papers.sort_by(|a, b| b.citations.cmp(&a.citations)),
        SortMode::Year => papers.sort_by(|a, b| b.year.cmp(&a.year)),
        SortMode::Relevance => {
            papers.sort_by(|a, b| b.relevance_score().total_cmp(&a.relevance_score()))
        }
    }
}
