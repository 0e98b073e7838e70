//! Knowledge graph handler
//!
//! Graphs are cached as serialized JSON under `graph:<slug>` and replayed
//! byte for byte on a hit.

use super::{millis, required, X_BUILD_TIME, X_CACHE};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use scholarnexus_common::{cache::keys, errors::Result, metrics};
use scholarnexus_graph::seed_positions;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub q: Option<String>,
    /// `build` (default) or `refresh` to bypass the cache
    pub action: Option<String>,
}

fn json_response(body: String, cache: &'static str, build_time: Option<u64>) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CACHE, HeaderValue::from_static(cache));
    if let Some(ms) = build_time {
        if let Ok(value) = HeaderValue::from_str(&millis(ms)) {
            headers.insert(X_BUILD_TIME, value);
        }
    }
    response
}

/// Build or replay the knowledge graph for a query
pub async fn graph(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Response> {
    let start = Instant::now();
    let query = required(params.q.as_deref(), "Query")?;
    let refresh = params.action.as_deref() == Some("refresh");
    let key = keys::graph(query);

    if !refresh {
        match state.cache.get(&key).await {
            Ok(Some(cached)) => {
                metrics::record_cache(true, "graph");
                return Ok(json_response(cached, "HIT", None));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, key = %key, "Cache unavailable, rebuilding graph"),
        }
    }
    metrics::record_cache(false, "graph");

    let config = &state.config.graph;
    let papers = state.source.search(query, 1, config.max_papers).await?.papers;

    let mut graph = state.graph.build(&papers, query);
    seed_positions(&mut graph, config.layout_width, config.layout_height, &mut rand::thread_rng());

    let body = serde_json::to_string(&graph)?;
    if let Err(e) = state
        .cache
        .put(&key, &body, Duration::from_secs(config.cache_ttl_secs))
        .await
    {
        warn!(error = %e, key = %key, "Failed to cache graph");
    }

    let elapsed = start.elapsed();
    metrics::record_graph_build(elapsed.as_secs_f64(), graph.nodes.len());
    info!(
        query,
        refresh,
        nodes = graph.metadata.total_nodes,
        links = graph.metadata.total_links,
        took_ms = elapsed.as_millis() as u64,
        "Graph built"
    );

    Ok(json_response(body, "MISS", Some(elapsed.as_millis() as u64)))
}
