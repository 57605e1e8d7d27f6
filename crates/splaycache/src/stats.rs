//! Memo statistics tracking

use std::fmt;

use serde::Serialize;

/// Counters for memo table effectiveness
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    hits: u64,
    misses: u64,
    inserts: u64,
    evictions: u64,
    invalidations: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup that found a value
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Record a lookup that found nothing
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Record a value stored in the table
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Record an entry pushed out by a capacity limit
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Record a wholesale invalidation of the table
    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    /// Total hits
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Total misses
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Total invalidations
    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }

    /// Hits plus misses
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} hit_ratio={:.1}% inserts={} evictions={} invalidations={}",
            self.hits,
            self.misses,
            self.hit_ratio() * 100.0,
            self.inserts,
            self.evictions,
            self.invalidations,
        )
    }
}
