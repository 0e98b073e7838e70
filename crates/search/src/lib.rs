//! ScholarNexus Search
//!
//! Paper search on top of a pluggable paper source:
//! - Request validation and normalization
//! - Post-retrieval filters (year range, citations, open access)
//! - Ranking by citations, year, or relevance
//! - Response caching keyed by the normalized query

pub mod ranking;
pub mod request;
pub mod service;

pub use ranking::{apply_filters, sort_papers};
pub use request::{SearchFilters, SearchRequest, SortMode};
pub use service::{cache_key, CacheStatus, SearchOutcome, SearchService};
