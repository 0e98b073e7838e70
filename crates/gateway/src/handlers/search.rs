//! Search handlers

use super::{millis, parse_param, required, X_CACHE, X_SEARCH_TIME};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use scholarnexus_common::errors::Result;
use scholarnexus_search::{SearchFilters, SearchRequest, SortMode};
use serde::Deserialize;

/// Raw query string of `GET /api/search`; numbers are parsed by hand so
/// malformed values produce the regular error body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub min_citations: Option<String>,
    pub open_access: Option<String>,
}

impl SearchParams {
    /// Turn parameters into a request, applying defaults and the page size cap
    pub fn into_request(self, default_page_size: u32, max_page_size: u32) -> Result<SearchRequest> {
        let query = required(self.q.as_deref(), "Query")?.to_string();

        let page = parse_param(self.page.as_deref(), "page")?.unwrap_or(1);
        let page_size = parse_param(self.page_size.as_deref(), "pageSize")?
            .unwrap_or(default_page_size)
            .min(max_page_size);

        let filters = SearchFilters {
            year_from: parse_param(self.year_from.as_deref(), "yearFrom")?,
            year_to: parse_param(self.year_to.as_deref(), "yearTo")?,
            min_citations: parse_param(self.min_citations.as_deref(), "minCitations")?,
            open_access: self.open_access.as_deref() == Some("true"),
        };

        Ok(SearchRequest::new(query)
            .page(page)
            .page_size(page_size)
            .sort(self.sort.as_deref().map(SortMode::parse_lenient).unwrap_or_default())
            .filters(filters))
    }
}

/// Search papers
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse> {
    let config = &state.config.search;
    let request = params.into_request(config.default_page_size, config.max_page_size)?;

    let outcome = state.search.search(&request).await?;

    Ok((
        [
            (X_CACHE, outcome.cache.as_header().to_string()),
            (X_SEARCH_TIME, millis(outcome.result.search_time)),
        ],
        Json(outcome.result),
    ))
}
