//! Expiry Policy Module
//!
//! Fixed-TTL expiry decided by comparing a caller-supplied "now" against the
//! expiry timestamp stored at write time. Expired entries are only evicted
//! when something touches them.

use chrono::Utc;

use crate::cache::EntryMetadata;

// == Expiry Policy ==
/// Uniform TTL applied to every entry when it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    ttl_secs: u64,
}

impl ExpiryPolicy {
    /// Creates a policy with the given TTL in seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    /// Expiry timestamp for an entry created at `created`.
    pub fn expiry_for(&self, created: i64) -> i64 {
        created.saturating_add(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX))
    }

    /// An entry stays valid up to and including its expiry second.
    pub fn is_expired(&self, metadata: &EntryMetadata, now: i64) -> bool {
        now > metadata.expiry
    }
}

/// Returns current Unix timestamp in seconds.
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}
