//! Expiring Cache Module
//!
//! In-process cache for users, courses and lessons. One reader/writer lock
//! guards all three kinds; each kind has its own key space.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, EntryStore, StatsCounters, SystemClock};
use crate::error::CacheError;
use crate::models::{Course, Lesson, User};

// == Record Kind ==
/// The independently cached record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Course,
    Lesson,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::User => "user",
            RecordKind::Course => "course",
            RecordKind::Lesson => "lesson",
        };
        f.write_str(name)
    }
}

// == Expiration ==
/// How long a `set` keeps its entry alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the cache's configured default
    #[default]
    Default,
    /// Expire this long after insertion
    After(Duration),
    /// Never expire
    Never,
}

// == Settings ==
/// Construction parameters for [`ExpiringCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Lifetime applied by [`Expiration::Default`]; zero means never expire
    pub default_expiration: Duration,
    /// Period between background sweeps; zero disables the sweeper
    pub cleanup_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_expiration: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(90),
        }
    }
}

// == Shards ==
/// One entry store per record kind.
#[derive(Debug, Default)]
pub struct Shards {
    users: EntryStore<User>,
    courses: EntryStore<Course>,
    lessons: EntryStore<Lesson>,
}

/// A record type the cache can hold.
///
/// Selects the shard for the type, so one generic code path serves every kind
/// while keys of different kinds never collide.
pub trait CacheRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn shard(shards: &Shards) -> &EntryStore<Self>;

    fn shard_mut(shards: &mut Shards) -> &mut EntryStore<Self>;
}

impl CacheRecord for User {
    const KIND: RecordKind = RecordKind::User;

    fn shard(shards: &Shards) -> &EntryStore<Self> {
        &shards.users
    }

    fn shard_mut(shards: &mut Shards) -> &mut EntryStore<Self> {
        &mut shards.users
    }
}

impl CacheRecord for Course {
    const KIND: RecordKind = RecordKind::Course;

    fn shard(shards: &Shards) -> &EntryStore<Self> {
        &shards.courses
    }

    fn shard_mut(shards: &mut Shards) -> &mut EntryStore<Self> {
        &mut shards.courses
    }
}

impl CacheRecord for Lesson {
    const KIND: RecordKind = RecordKind::Lesson;

    fn shard(shards: &Shards) -> &EntryStore<Self> {
        &shards.lessons
    }

    fn shard_mut(shards: &mut Shards) -> &mut EntryStore<Self> {
        &mut shards.lessons
    }
}

// == Expiring Cache ==
/// Time-expiring cache shared by all request handlers.
///
/// Cloning is cheap and every clone sees the same entries.
#[derive(Debug, Clone)]
pub struct ExpiringCache {
    shards: Arc<RwLock<Shards>>,
    stats: Arc<StatsCounters>,
    default_expiration: Duration,
    clock: Arc<dyn Clock>,
}

impl ExpiringCache {
    // == Constructor ==
    /// Creates an empty cache on the system clock.
    ///
    /// The sweeper is started separately with
    /// [`spawn_cleanup_task`](crate::tasks::spawn_cleanup_task).
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            shards: Arc::new(RwLock::new(Shards::default())),
            stats: Arc::new(StatsCounters::default()),
            default_expiration: settings.default_expiration,
            clock,
        }
    }

    // == Get ==
    /// Returns a clone of the live entry for `key`.
    ///
    /// # Errors
    /// - `CacheError::NotFound` if nothing was stored under `key`
    /// - `CacheError::Expired` if the entry's expiration instant has passed
    pub async fn get<R: CacheRecord>(&self, key: &str) -> Result<R, CacheError> {
        let now = self.clock.now();
        let result = {
            let shards = self.shards.read().await;
            R::shard(&shards).get(key, now).cloned()
        };

        self.stats.record(&result);
        if let Err(err) = &result {
            debug!(kind = %R::KIND, key, error = %err, "cache lookup missed");
        }
        result
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its
    /// expiration window.
    pub async fn set<R: CacheRecord>(
        &self,
        key: impl Into<String>,
        value: R,
        expiration: Expiration,
    ) {
        let ttl = self.resolve_ttl(expiration);
        let entry = CacheEntry::new(value, self.clock.now(), ttl);

        let mut shards = self.shards.write().await;
        R::shard_mut(&mut shards).insert(key.into(), entry);
    }

    fn resolve_ttl(&self, expiration: Expiration) -> Option<Duration> {
        match expiration {
            Expiration::Default if self.default_expiration.is_zero() => None,
            Expiration::Default => Some(self.default_expiration),
            Expiration::After(ttl) if ttl.is_zero() => self.resolve_ttl(Expiration::Default),
            Expiration::After(ttl) => Some(ttl),
            Expiration::Never => None,
        }
    }

    // == Per-kind Accessors ==
    pub async fn get_user(&self, key: &str) -> Result<User, CacheError> {
        self.get(key).await
    }

    pub async fn set_user(&self, key: impl Into<String>, value: User, expiration: Expiration) {
        self.set(key, value, expiration).await
    }

    pub async fn get_course(&self, key: &str) -> Result<Course, CacheError> {
        self.get(key).await
    }

    pub async fn set_course(&self, key: impl Into<String>, value: Course, expiration: Expiration) {
        self.set(key, value, expiration).await
    }

    pub async fn get_lesson(&self, key: &str) -> Result<Lesson, CacheError> {
        self.get(key).await
    }

    pub async fn set_lesson(&self, key: impl Into<String>, value: Lesson, expiration: Expiration) {
        self.set(key, value, expiration).await
    }

    // == Sweep ==
    /// Removes expired entries of every kind under a single write lock.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut shards = self.shards.write().await;
        shards.users.sweep(now) + shards.courses.sweep(now) + shards.lessons.sweep(now)
    }

    // == Inspection ==
    /// Returns true if an entry is physically held for `key`, even an expired one.
    pub async fn contains_entry<R: CacheRecord>(&self, key: &str) -> bool {
        let shards = self.shards.read().await;
        R::shard(&shards).entry(key).is_some()
    }

    /// Returns the number of entries physically held for `kind`.
    pub async fn len(&self, kind: RecordKind) -> usize {
        let shards = self.shards.read().await;
        match kind {
            RecordKind::User => shards.users.len(),
            RecordKind::Course => shards.courses.len(),
            RecordKind::Lesson => shards.lessons.len(),
        }
    }

    /// Returns lookup counters and per-kind entry counts.
    pub async fn stats(&self) -> CacheStats {
        let shards = self.shards.read().await;
        CacheStats {
            users: shards.users.len(),
            courses: shards.courses.len(),
            lessons: shards.lessons.len(),
            ..self.stats.snapshot()
        }
    }
}
