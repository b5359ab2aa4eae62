//! Cache Statistics Module
//!
//! Tracks lookup outcomes, writes and evictions for one store instance.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache outcome counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found a valid entry
    pub hits: u64,
    /// Lookups that found no entry
    pub misses: u64,
    /// Lookups that found an expired entry
    pub expired: u64,
    /// Lookups that found an unreadable entry
    pub corrupt: u64,
    /// Documents written
    pub writes: u64,
    /// Entries removed, lazily or by a sweep
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Expired and corrupt lookups count as misses. Returns 0.0 if no lookups
    /// have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses + self.expired + self.corrupt
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    pub fn record_corrupt(&mut self) {
        self.corrupt += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    // == Record Eviction ==
    /// Adds `count` to the eviction counter.
    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }
}
