//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with absolute expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A cached record with its creation time and expiration instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached record
    pub value: V,
    /// Insertion time; a later `set` replaces the whole entry
    pub created_at: DateTime<Utc>,
    /// Absolute expiration instant, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry inserted at `now` that lives for `ttl`.
    ///
    /// `None` creates an entry that never expires. A ttl too large to be
    /// represented as an instant is treated the same way.
    pub fn new(value: V, now: DateTime<Utc>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| now.checked_add_signed(ttl));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant, so an
    /// entry set with ttl `d` at `t0` is live on `[t0, t0 + d)`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
