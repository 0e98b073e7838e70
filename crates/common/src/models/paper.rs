//! Paper record and search result shapes

use serde::{Deserialize, Serialize};

/// A paper as returned by a paper source.
///
/// Read-only once retrieved. Optional list fields default to empty so that
/// partially populated records from remote sources stay usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: String,

    pub title: String,

    /// Author names in publication order
    #[serde(default)]
    pub authors: Vec<String>,

    pub year: i32,

    #[serde(default)]
    pub citations: u64,

    #[serde(rename = "abstract", default)]
    pub abstract_text: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub venue: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub open_access: bool,

    /// Ids of papers this one cites
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl Paper {
    /// Composite ordering score blending impact and recency:
    /// `citations * 0.3 + (year - 2000) * 10`.
    pub fn relevance_score(&self) -> f64 {
        self.citations as f64 * 0.3 + (self.year as f64 - 2000.0) * 10.0
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub papers: Vec<Paper>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    /// Milliseconds spent serving this response
    pub search_time: u64,
}
