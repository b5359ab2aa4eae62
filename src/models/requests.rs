//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::cache::{resolve_key, CacheKey, KeyMode};
use crate::error::Result;

/// Default source label when a writer does not name one.
pub const DEFAULT_SOURCE: &str = "Context7";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Query string for `GET /check`
#[derive(Debug, Clone, Deserialize)]
pub struct KeyParams {
    /// Library identifier or free-text query
    pub key: String,
    /// Addressing mode (default: library)
    #[serde(default)]
    pub mode: KeyMode,
}

impl KeyParams {
    /// Resolves the addressed cache key.
    pub fn resolve(&self) -> Result<CacheKey> {
        resolve_key(self.mode, &self.key)
    }
}

/// Query string for `GET /query`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    /// Library identifier or free-text query
    pub key: String,
    /// Whitespace-separated search terms
    pub terms: String,
    /// Addressing mode (default: library)
    #[serde(default)]
    pub mode: KeyMode,
}

impl QueryParams {
    /// Resolves the addressed cache key.
    pub fn resolve(&self) -> Result<CacheKey> {
        resolve_key(self.mode, &self.key)
    }
}

/// Request body for `PUT /write`
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    /// Library identifier or free-text query
    pub key: String,
    /// Addressing mode (default: library)
    #[serde(default)]
    pub mode: KeyMode,
    /// Provenance label
    #[serde(default = "default_source")]
    pub source: String,
    /// Document body; surrounding whitespace is trimmed before storing
    pub content: String,
}

impl WriteRequest {
    /// Resolves the addressed cache key.
    pub fn resolve(&self) -> Result<CacheKey> {
        resolve_key(self.mode, &self.key)
    }
}
