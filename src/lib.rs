//! doccache - A local disk-backed documentation cache
//!
//! Caches fetched documentation under a library identifier or a free-text
//! query, expires entries after a fixed TTL, and searches inside cached
//! documents without re-fetching them.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tasks;

pub use api::AppState;
pub use cache::{resolve_key, CacheKey, DocCache, KeyMode, Lookup};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
