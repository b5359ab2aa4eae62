//! API Module
//!
//! HTTP handlers and routing for the `serve` mode of the cache.
//!
//! # Endpoints
//! - `GET /check` - Entry status and document on a hit
//! - `PUT /write` - Store a document
//! - `GET /query` - Search inside a cached document
//! - `POST /sweep` - Remove expired entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
