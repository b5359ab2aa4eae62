//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    check_handler, health_handler, query_handler, stats_handler, sweep_handler, write_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /check?key=&mode=` - Entry status and document on a hit
/// - `PUT /write` - Store a document
/// - `GET /query?key=&terms=&mode=` - Search inside a cached document
/// - `POST /sweep` - Remove expired entries
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (the server binds to loopback only)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/check", get(check_handler))
        .route("/write", put(write_handler))
        .route("/query", get(query_handler))
        .route("/sweep", post(sweep_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
