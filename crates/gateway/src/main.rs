//! ScholarNexus API Gateway
//!
//! The entry point for all client requests.
//! Handles:
//! - Paper search with response caching
//! - Knowledge graph construction
//! - AI analysis (offline analytics and LLM pass-through)
//! - Rate limiting and CORS
//! - Observability (logging, metrics)

mod handlers;
mod middleware;
mod state;
mod telemetry;

pub use state::AppState;

use anyhow::Context;
use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, Method},
    middleware::{from_fn, Next},
    routing::get,
    Router,
};
use handlers::{X_API_KEY, X_BUILD_TIME, X_CACHE, X_SEARCH_TIME};
use middleware::{
    metrics::track_metrics,
    rate_limit::{create_rate_limiter, rate_limit_middleware},
};
use scholarnexus_common::{
    cache::{MemoryStore, RedisStore},
    config::{AppConfig, RedisConfig},
    sources::create_source,
    KvStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    telemetry::init_tracing(&config.observability);
    info!("Starting ScholarNexus API Gateway v{}", scholarnexus_common::VERSION);

    // Initialize metrics
    telemetry::init_metrics(config.observability.metrics_port)?;

    let cache = connect_cache(&config.redis).await;
    let source = create_source(&config.source)?;
    info!(cache = cache.backend(), source = source.name(), "Backends ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    // Create app state
    let state = AppState::new(Arc::new(config), source, cache);

    // Build the router
    let app = create_router(state);

    // Start the server
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Use Redis when configured and reachable, the in-process store otherwise
async fn connect_cache(config: &RedisConfig) -> Arc<dyn KvStore> {
    let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) else {
        info!("No Redis URL configured, using in-memory cache");
        return Arc::new(MemoryStore::new());
    };

    match RedisStore::connect(url, config.key_prefix.clone()).await {
        Ok(store) => {
            info!("Connected to Redis");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, X_API_KEY])
        .expose_headers([X_CACHE, X_SEARCH_TIME, X_BUILD_TIME]);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        .route(
            "/search",
            get(handlers::search::search).options(handlers::preflight),
        )
        .route(
            "/graph",
            get(handlers::graph::graph).options(handlers::preflight),
        )
        .route(
            "/ai",
            get(handlers::ai::analyze)
                .post(handlers::ai::complete)
                .options(handlers::preflight),
        )
        .route_layer(from_fn(track_metrics));

    let mut app = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes);

    let limits = &state.config.rate_limit;
    if limits.enabled {
        let limiter = create_rate_limiter(limits.requests_per_second, limits.burst);
        let limit = limits.requests_per_second;
        app = app.layer(from_fn(move |request: Request, next: Next| {
            rate_limit_middleware(request, next, limiter.clone(), limit)
        }));
    }

    // Compose the app
    app.layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
