//! Paper source abstraction
//!
//! Provides a unified interface over where candidate papers come from:
//! - Built-in catalogue (offline development and tests)
//! - Semantic Scholar Graph API

mod mock;
mod semantic_scholar;

pub use mock::MockSource;
pub use semantic_scholar::SemanticScholarSource;

use crate::config::{SourceConfig, SourceKind};
use crate::errors::Result;
use crate::models::Paper;
use async_trait::async_trait;
use std::sync::Arc;

/// One page of candidates from a source
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub papers: Vec<Paper>,
    /// Total matches known to the source
    pub total: u64,
}

/// Trait for paper retrieval
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Search papers; `page` is 1-based
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SourcePage>;

    /// Fetch a single paper by id
    async fn fetch(&self, id: &str) -> Result<Option<Paper>>;

    /// Source name for logs
    fn name(&self) -> &str;
}

/// Create a paper source based on configuration
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn PaperSource>> {
    match config.kind {
        SourceKind::Mock => Ok(Arc::new(MockSource::new()?)),
        SourceKind::SemanticScholar => Ok(Arc::new(SemanticScholarSource::new(
            config.api_key.clone(),
            config.api_base.clone(),
            config.timeout_secs,
        )?)),
    }
}
