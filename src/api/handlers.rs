//! API Handlers
//!
//! HTTP request handlers exposing cache check, write, query and sweep.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::DocCache;
use crate::config::{Config, DEFAULT_CONTEXT_LINES};
use crate::error::Result;
use crate::models::{
    CheckResponse, HealthResponse, KeyParams, QueryParams, QueryResponse, StatsResponse,
    SweepResponse, WriteRequest, WriteResponse,
};
use crate::tasks::with_cache;

/// Application state shared across all handlers.
///
/// Contains the cache store wrapped in Arc<RwLock<>> for thread-safe access.
/// Store calls go through [`with_cache`] so filesystem work stays off the
/// runtime workers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<DocCache>>,
    /// Lines of context around each search match
    pub context_lines: usize,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: DocCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            context_lines: config.context_lines,
            ..Self::new(DocCache::from_config(config))
        }
    }
}

/// Handler for GET /check
///
/// Reports the entry status; misses are successful responses.
pub async fn check_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
) -> Result<Json<CheckResponse>> {
    let key = params.resolve()?;

    // Write lock: an expired entry is evicted and stats are updated
    let lookup = with_cache(&state.cache, move |cache| cache.check(&key)).await?;

    Ok(Json(CheckResponse::from(lookup)))
}

/// Handler for PUT /write
///
/// Stores a document; the body is trimmed and must not be empty.
pub async fn write_handler(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<WriteResponse>> {
    let key = req.resolve()?;

    let receipt = with_cache(&state.cache, move |cache| {
        cache.write(&key, &req.source, req.content.trim())
    })
    .await??;

    Ok(Json(WriteResponse::from(receipt)))
}

/// Handler for GET /query
///
/// Searches inside a cached document and returns matching sections.
pub async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>> {
    let key = params.resolve()?;

    let context = state.context_lines;
    let (lookup_key, terms) = (key.clone(), params.terms.clone());
    let outcome = with_cache(&state.cache, move |cache| {
        cache.query(&lookup_key, &terms, context)
    })
    .await?;

    Ok(Json(QueryResponse::new(outcome, &key, &params.terms)))
}

/// Handler for POST /sweep
///
/// Removes every expired entry under the cache root.
pub async fn sweep_handler(State(state): State<AppState>) -> Result<Json<SweepResponse>> {
    let removed = with_cache(&state.cache, |cache| cache.sweep_expired()).await??;

    Ok(Json(SweepResponse { removed }))
}

/// Handler for GET /stats
///
/// Returns outcome counters for this server process.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
