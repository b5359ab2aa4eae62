//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheKey, CacheStats, Lookup, QueryOutcome, WriteReceipt};

/// Response body for `GET /check`
///
/// Misses are reported here with a `MISS` status rather than as errors.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// `HIT`, `MISS`, `EXPIRED` or `ERROR`
    pub status: String,
    /// Human-readable status line
    pub message: String,
    /// Entry directory examined
    pub path: String,
    /// Provenance label, on a hit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Entry age in hours, on a hit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_hours: Option<f64>,
    /// Cached document, on a hit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<Lookup> for CheckResponse {
    fn from(lookup: Lookup) -> Self {
        let status = lookup.status().to_string();
        let message = lookup.to_string();
        let path = lookup.path().display().to_string();

        match lookup.into_document() {
            Some(doc) => Self {
                status,
                message,
                path,
                source: Some(doc.metadata.source),
                age_hours: Some(doc.age_hours),
                content: Some(doc.body),
            },
            None => Self {
                status,
                message,
                path,
                source: None,
                age_hours: None,
                content: None,
            },
        }
    }
}

/// Response body for `GET /query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// `QUERY HIT`, `QUERY MISS`, or the lookup status when nothing is cached
    pub status: String,
    /// Human-readable status line
    pub message: String,
    /// Matching excerpts in document order
    pub sections: Vec<String>,
}

impl QueryResponse {
    /// Builds the response for a query outcome.
    pub fn new(outcome: QueryOutcome, key: &CacheKey, terms: &str) -> Self {
        let message = outcome
            .status_line(key, terms)
            .unwrap_or_else(|| outcome.lookup_status_line());

        match outcome {
            QueryOutcome::Found { excerpts, .. } => Self {
                status: "QUERY HIT".to_string(),
                message,
                sections: excerpts,
            },
            QueryOutcome::NoMatch { .. } => Self {
                status: "QUERY MISS".to_string(),
                message,
                sections: Vec::new(),
            },
            QueryOutcome::NotCached(lookup) => Self {
                status: lookup.status().to_string(),
                message,
                sections: Vec::new(),
            },
        }
    }
}

/// Response body for `PUT /write`
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Confirmation line
    pub message: String,
    /// Entry directory written
    pub path: String,
    /// Body length in characters
    pub chars: usize,
    /// Body length in bytes
    pub bytes: usize,
    /// Expiry timestamp (Unix seconds)
    pub expiry: i64,
}

impl From<WriteReceipt> for WriteResponse {
    fn from(receipt: WriteReceipt) -> Self {
        Self {
            message: receipt.to_string(),
            path: receipt.path.display().to_string(),
            chars: receipt.chars,
            bytes: receipt.bytes,
            expiry: receipt.metadata.expiry,
        }
    }
}

/// Response body for `POST /sweep`
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub corrupt: u64,
    pub writes: u64,
    pub evictions: u64,
    /// Hit rate over all lookups
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            corrupt: stats.corrupt,
            writes: stats.writes,
            evictions: stats.evictions,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
