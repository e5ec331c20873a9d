//! Cache Statistics Module
//!
//! Tracks cache lookups: hits, misses and expired reads.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::CacheError;

// == Stats Counters ==
/// Lock-free lookup counters, so `get` can stay on the shared lock.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl StatsCounters {
    /// Records the outcome of one lookup.
    pub fn record<T>(&self, outcome: &Result<T, CacheError>) {
        let counter = match outcome {
            Ok(_) => &self.hits,
            Err(CacheError::NotFound(_)) => &self.misses,
            Err(CacheError::Expired(_)) => &self.expired,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters into a snapshot with zeroed entry counts.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups for keys with no entry
    pub misses: u64,
    /// Lookups that found an expired entry
    pub expired: u64,
    /// Entries held per kind, expired ones included until swept
    pub users: usize,
    pub courses: usize,
    pub lessons: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / all lookups, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.expired;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Entries held across all kinds.
    pub fn total_entries(&self) -> usize {
        self.users + self.courses + self.lessons
    }
}
