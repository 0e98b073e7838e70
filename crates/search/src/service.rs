//! Cached search orchestration
//!
//! cache get -> source search -> filter -> sort -> cache put. The cache is
//! best effort: read or write failures are logged and the request is
//! served from the source.

use crate::ranking::{apply_filters, sort_papers};
use crate::request::SearchRequest;
use scholarnexus_common::{
    cache::keys,
    errors::Result,
    metrics,
    models::SearchResult,
    KvStore, PaperSource,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Whether a response came from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value of the `X-Cache` response header
    pub fn as_header(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub result: SearchResult,
    pub cache: CacheStatus,
}

/// Cache key for a request: hashed normalized query, pagination, sort, and
/// a filter fragment when any filter is set
pub fn cache_key(request: &SearchRequest) -> String {
    let normalized = keys::normalize_query(&request.query);
    let hash = hex::encode(Sha256::digest(normalized.as_bytes()));

    format!(
        "{}{}",
        keys::search_page(&hash, request.page, request.page_size, request.sort.as_str()),
        request.filters.cache_suffix()
    )
}

/// Search over a paper source with response caching
#[derive(Clone)]
pub struct SearchService {
    source: Arc<dyn PaperSource>,
    cache: Arc<dyn KvStore>,
    ttl: Duration,
}

impl SearchService {
    pub fn new(source: Arc<dyn PaperSource>, cache: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub fn source(&self) -> &Arc<dyn PaperSource> {
        &self.source
    }

    /// Run a search, serving from the cache when possible
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let start = Instant::now();
        request.check()?;

        let key = cache_key(request);

        if let Some(mut result) = self.cached(&key).await {
            result.search_time = start.elapsed().as_millis() as u64;
            metrics::record_cache(true, "search");
            debug!(key = %key, "Search served from cache");
            return Ok(SearchOutcome {
                result,
                cache: CacheStatus::Hit,
            });
        }
        metrics::record_cache(false, "search");

        let page = self
            .source
            .search(&request.query, request.page, request.page_size)
            .await?;

        let mut papers = apply_filters(page.papers, &request.filters);
        sort_papers(&mut papers, request.sort);

        let mut result = SearchResult {
            papers,
            total: page.total,
            page: request.page,
            page_size: request.page_size,
            query: request.query.clone(),
            search_time: 0,
        };

        match serde_json::to_string(&result) {
            Ok(payload) => {
                if let Err(e) = self.cache.put(&key, &payload, self.ttl).await {
                    warn!(error = %e, key = %key, "Failed to cache search result");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize search result"),
        }

        result.search_time = start.elapsed().as_millis() as u64;
        metrics::record_search(
            start.elapsed().as_secs_f64(),
            request.sort.as_str(),
            result.papers.len(),
        );

        info!(
            query = %request.query,
            source = self.source.name(),
            results = result.papers.len(),
            took_ms = result.search_time,
            "Search completed"
        );

        Ok(SearchOutcome {
            result,
            cache: CacheStatus::Miss,
        })
    }

    /// Cached result for `key`; unreadable entries count as misses
    async fn cached(&self, key: &str) -> Option<SearchResult> {
        let payload = match self.cache.get(key).await {
            Ok(payload) => payload?,
            Err(e) => {
                warn!(error = %e, key = %key, "Cache unavailable, searching source");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, key = %key, "Discarding unreadable cache entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{SearchFilters, SortMode};
    use async_trait::async_trait;
    use scholarnexus_common::{
        cache::MemoryStore,
        errors::AppError,
        models::Paper,
        sources::{MockSource, SourcePage},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(1800);

    /// Mock catalogue that counts calls
    struct CountingSource {
        inner: MockSource,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: MockSource::new().unwrap(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaperSource for CountingSource {
        async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SourcePage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.search(query, page, page_size).await
        }

        async fn fetch(&self, id: &str) -> Result<Option<Paper>> {
            self.inner.fetch(id).await
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PaperSource for FailingSource {
        async fn search(&self, _query: &str, _page: u32, _page_size: u32) -> Result<SourcePage> {
            Err(AppError::Upstream {
                message: "connection refused".into(),
            })
        }

        async fn fetch(&self, _id: &str) -> Result<Option<Paper>> {
            Ok(None)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(AppError::CacheError {
                message: "connection reset".into(),
            })
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
            Err(AppError::CacheError {
                message: "connection reset".into(),
            })
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_cache_key_normalizes_query() {
        let a = cache_key(&SearchRequest::new("  Deep   Learning"));
        let b = cache_key(&SearchRequest::new("deep learning"));
        assert_eq!(a, b);
        assert!(a.starts_with("search:"));
        assert!(a.ends_with(":1:20:relevance"));

        let sorted = cache_key(&SearchRequest::new("deep learning").sort(SortMode::Year));
        assert_ne!(a, sorted);

        let filtered = cache_key(&SearchRequest::new("deep learning").filters(SearchFilters {
            open_access: true,
            ..Default::default()
        }));
        assert!(filtered.ends_with(":relevance:f=---true"));
    }

    #[tokio::test]
    async fn test_second_search_is_a_hit() {
        let source = CountingSource::new();
        let cache = Arc::new(MemoryStore::new());
        let service = SearchService::new(source.clone(), cache.clone(), TTL);
        let request = SearchRequest::new("Object Detection").sort(SortMode::Citations);

        let first = service.search(&request).await.unwrap();
        assert_eq!(first.cache, CacheStatus::Miss);
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.len().await, 1);

        let second = service.search(&request).await.unwrap();
        assert_eq!(second.cache, CacheStatus::Hit);
        assert_eq!(source.calls(), 1);
        assert_eq!(first.result.papers, second.result.papers);
        assert_eq!(first.result.total, second.result.total);
        assert_eq!(first.result.page, second.result.page);
        assert_eq!(first.result.page_size, second.result.page_size);
        assert_eq!(first.result.query, second.result.query);
        assert_eq!(second.result.query, "Object Detection");
    }

    #[tokio::test]
    async fn test_results_sorted_and_paged() {
        let service = SearchService::new(CountingSource::new(), Arc::new(MemoryStore::new()), TTL);
        let request = SearchRequest::new("deep learning")
            .page(2)
            .page_size(5)
            .sort(SortMode::Year);

        let outcome = service.search(&request).await.unwrap();
        assert_eq!(outcome.result.page, 2);
        assert_eq!(outcome.result.page_size, 5);

        let years: Vec<i32> = outcome.result.papers.iter().map(|p| p.year).collect();
        assert!(years.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_missing_query_skips_source() {
        let source = CountingSource::new();
        let service = SearchService::new(source.clone(), Arc::new(MemoryStore::new()), TTL);

        let err = service.search(&SearchRequest::new("")).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField { .. }));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_source_failure_not_cached() {
        let cache = Arc::new(MemoryStore::new());
        let service = SearchService::new(Arc::new(FailingSource), cache.clone(), TTL);

        let err = service.search(&SearchRequest::new("anything")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_failure_degrades_to_miss() {
        let source = CountingSource::new();
        let service = SearchService::new(source.clone(), Arc::new(BrokenStore), TTL);
        let request = SearchRequest::new("attention");

        let first = service.search(&request).await.unwrap();
        let second = service.search(&request).await.unwrap();

        assert_eq!(first.cache, CacheStatus::Miss);
        assert_eq!(second.cache, CacheStatus::Miss);
        assert_eq!(source.calls(), 2);
        assert!(!second.result.papers.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_miss() {
        let cache = Arc::new(MemoryStore::new());
        let request = SearchRequest::new("attention");
        cache.put(&cache_key(&request), "not json", TTL).await.unwrap();

        let service = SearchService::new(CountingSource::new(), cache.clone(), TTL);
        let outcome = service.search(&request).await.unwrap();
        assert_eq!(outcome.cache, CacheStatus::Miss);

        let again = service.search(&request).await.unwrap();
        assert_eq!(again.cache, CacheStatus::Hit);
    }
}
