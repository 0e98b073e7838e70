//! Search request types

use scholarnexus_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Relevance,
    Citations,
    Year,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Citations => "citations",
            SortMode::Year => "year",
        }
    }

    /// Parse a user-supplied value; anything unrecognized ranks by relevance
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for SortMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "citations" => Ok(SortMode::Citations),
            "year" => Ok(SortMode::Year),
            other => Err(AppError::InvalidFormat {
                message: format!("Unknown sort mode: {}", other),
            }),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional post-retrieval filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Inclusive lower bound on publication year
    pub year_from: Option<i32>,

    /// Inclusive upper bound on publication year
    pub year_to: Option<i32>,

    pub min_citations: Option<u64>,

    /// Keep open-access papers only
    #[serde(default)]
    pub open_access: bool,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.year_from.is_none()
            && self.year_to.is_none()
            && self.min_citations.is_none()
            && !self.open_access
    }

    /// Cache key fragment; empty when no filter is set
    pub fn cache_suffix(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        fn part<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        format!(
            ":f={}-{}-{}-{}",
            part(self.year_from),
            part(self.year_to),
            part(self.min_citations),
            self.open_access
        )
    }
}

/// A validated search
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 500))]
    pub query: String,

    /// 1-based page number
    #[validate(range(min = 1, max = 10_000))]
    pub page: u32,

    #[validate(range(min = 1, max = 50))]
    pub page_size: u32,

    pub sort: SortMode,

    pub filters: SearchFilters,
}

impl SearchRequest {
    /// First page of 20, ranked by relevance, unfiltered
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            page_size: 20,
            sort: SortMode::default(),
            filters: SearchFilters::default(),
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Validate, mapping failures onto `AppError::Validation`
    pub fn check(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::missing("Query"));
        }

        self.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: e.field_errors().keys().next().map(|k| k.to_string()),
        })
    }
}
