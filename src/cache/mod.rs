//! Cache Module
//!
//! Provides the in-memory record cache with absolute-time expiration,
//! lazy expiry on read and a periodic sweep.

mod clock;
mod entry;
mod expiring;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use expiring::{CacheRecord, CacheSettings, Expiration, ExpiringCache, RecordKind, Shards};
pub use stats::{CacheStats, StatsCounters};
pub use store::EntryStore;
