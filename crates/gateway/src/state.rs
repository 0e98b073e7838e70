//! Shared application state

use scholarnexus_common::{config::AppConfig, llm::LlmClient, KvStore, PaperSource};
use scholarnexus_graph::{BuilderOptions, GraphBuilder};
use scholarnexus_search::SearchService;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn PaperSource>,
    pub cache: Arc<dyn KvStore>,
    pub search: SearchService,
    pub graph: Arc<GraphBuilder>,
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<dyn PaperSource>,
        cache: Arc<dyn KvStore>,
    ) -> Self {
        let search = SearchService::new(
            source.clone(),
            cache.clone(),
            Duration::from_secs(config.search.cache_ttl_secs),
        );
        let graph = Arc::new(GraphBuilder::new(BuilderOptions::from(&config.graph)));
        let llm = LlmClient::new(&config.llm);

        Self {
            config,
            source,
            cache,
            search,
            graph,
            llm,
        }
    }
}
