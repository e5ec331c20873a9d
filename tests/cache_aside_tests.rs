//! Integration Tests for the cache-aside read path
//!
//! Drives the coordinator against a store that counts its lookups.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coursebot::auth::{BcryptVerifier, PasswordVerifier};
use coursebot::cache::{CacheSettings, Expiration, ExpiringCache, ManualClock, RecordKind};
use coursebot::db::{MemoryStore, RecordStore};
use coursebot::error::{AppError, CacheError, StoreError, StoreResult};
use coursebot::models::{Course, Lesson, NewLesson, User};
use coursebot::{spawn_cleanup_task, AccessCoordinator};

// == Helpers ==

/// Wraps a MemoryStore, counting point lookups and optionally failing them.
#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryStore,
    user_lookups: AtomicUsize,
    course_lookups: AtomicUsize,
    lesson_lookups: AtomicUsize,
    unavailable: bool,
}

impl CountingStore {
    fn check(&self) -> StoreResult<()> {
        if self.unavailable {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for CountingStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        self.inner.create_user(email, password_hash).await
    }

    async fn get_user(&self, email: &str) -> StoreResult<User> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get_user(email).await
    }

    async fn get_user_by_chat(&self, chat_id: i64) -> StoreResult<User> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get_user_by_chat(chat_id).await
    }

    async fn update_user_chat(&self, email: &str, chat_id: i64) -> StoreResult<()> {
        self.inner.update_user_chat(email, chat_id).await
    }

    async fn get_user_courses(&self, chat_id: i64) -> StoreResult<Vec<Course>> {
        self.inner.get_user_courses(chat_id).await
    }

    async fn add_user_course(&self, chat_id: i64, course: Course) -> StoreResult<()> {
        self.inner.add_user_course(chat_id, course).await
    }

    async fn get_course(&self, id: &str) -> StoreResult<Course> {
        self.course_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get_course(id).await
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        self.inner.list_courses().await
    }

    async fn create_course(
        &self,
        title: &str,
        description: &str,
        lessons: Vec<Lesson>,
    ) -> StoreResult<Course> {
        self.inner.create_course(title, description, lessons).await
    }

    async fn get_course_lessons(&self, course_id: &str) -> StoreResult<Vec<Lesson>> {
        self.inner.get_course_lessons(course_id).await
    }

    async fn create_lesson(&self, lesson: NewLesson) -> StoreResult<Lesson> {
        self.inner.create_lesson(lesson).await
    }

    async fn get_lesson(&self, id: &str) -> StoreResult<Lesson> {
        self.lesson_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get_lesson(id).await
    }
}

fn test_verifier() -> BcryptVerifier {
    BcryptVerifier::new(4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */)
}

struct Harness {
    coordinator: AccessCoordinator,
    cache: ExpiringCache,
    store: Arc<CountingStore>,
    clock: ManualClock,
}

async fn harness(store: CountingStore) -> Harness {
    let clock = ManualClock::default();
    let settings = CacheSettings {
        default_expiration: Duration::from_secs(60),
        cleanup_interval: Duration::from_secs(90),
    };
    let cache = ExpiringCache::with_clock(settings, Arc::new(clock.clone()));
    let store = Arc::new(store);
    store
        .create_user("student@school.test", &test_verifier().hash("pw").unwrap())
        .await
        .unwrap();

    let coordinator = AccessCoordinator::new(cache.clone(), store.clone(), Arc::new(test_verifier()));
    Harness {
        coordinator,
        cache,
        store,
        clock,
    }
}

async fn add_lesson(store: &CountingStore) -> Lesson {
    store
        .create_lesson(NewLesson {
            title: "Integrals".to_string(),
            lecture: "https://video.test/integrals".to_string(),
            task: "https://forms.test/integrals".to_string(),
            estimated_minutes: 75,
        })
        .await
        .unwrap()
}

// == Cache-aside Fallback ==

#[tokio::test]
async fn test_miss_loads_from_store_then_hits_cache() {
    let h = harness(CountingStore::default()).await;

    let user = h
        .coordinator
        .login("student@school.test", "pw", 11)
        .await
        .unwrap();
    assert_eq!(h.store.user_lookups.load(Ordering::SeqCst), 1);

    let cached = h.cache.get_user("student@school.test").await.unwrap();
    assert_eq!(cached.id, user.id);

    h.coordinator
        .login("student@school.test", "pw", 11)
        .await
        .unwrap();
    assert_eq!(
        h.store.user_lookups.load(Ordering::SeqCst),
        1,
        "Second login should be served from the cache"
    );
}

#[tokio::test]
async fn test_lesson_read_through() {
    let h = harness(CountingStore::default()).await;
    let lesson = add_lesson(&h.store).await;

    assert_eq!(h.cache.get_lesson(&lesson.id).await, Err(CacheError::NotFound(lesson.id.clone())));

    assert_eq!(h.coordinator.view_lesson(&lesson.id).await.unwrap(), lesson);
    assert_eq!(h.coordinator.view_lesson(&lesson.id).await.unwrap(), lesson);

    assert_eq!(h.store.lesson_lookups.load(Ordering::SeqCst), 1);
    assert_eq!(h.cache.get_lesson(&lesson.id).await, Ok(lesson));
}

#[tokio::test]
async fn test_expired_entry_reloads_from_store() {
    let h = harness(CountingStore::default()).await;
    let lesson = add_lesson(&h.store).await;

    h.coordinator.view_lesson(&lesson.id).await.unwrap();
    h.clock.advance(Duration::from_secs(61));
    assert!(matches!(
        h.cache.get_lesson(&lesson.id).await,
        Err(CacheError::Expired(_))
    ));

    h.coordinator.view_lesson(&lesson.id).await.unwrap();
    assert_eq!(h.store.lesson_lookups.load(Ordering::SeqCst), 2);
    assert!(h.cache.get_lesson(&lesson.id).await.is_ok());
}

#[tokio::test]
async fn test_cached_value_wins_over_store() {
    let h = harness(CountingStore::default()).await;
    let course = h.store.create_course("Biology", "Cells", vec![]).await.unwrap();
    h.coordinator
        .login("student@school.test", "pw", 4)
        .await
        .unwrap();

    let mut renamed = course.clone();
    renamed.title = "Cached title".to_string();
    h.cache
        .set(course.id.clone(), renamed, Expiration::Never)
        .await;

    let registered = h.coordinator.register_for_course(4, &course.id).await.unwrap();
    assert_eq!(registered.title, "Cached title");
    assert_eq!(h.store.course_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_not_found_is_surfaced_and_not_cached() {
    let h = harness(CountingStore::default()).await;

    let result = h.coordinator.register_for_course(99, "c-missing").await;
    assert!(matches!(result, Err(AppError::NotAuthenticated(99))));
    assert_eq!(h.cache.len(RecordKind::User).await, 0);
}

#[tokio::test]
async fn test_store_outage_is_operational_failure() {
    let h = harness(CountingStore {
        unavailable: true,
        ..CountingStore::default()
    })
    .await;

    let result = h.coordinator.view_lesson("l1").await;
    assert!(matches!(
        result,
        Err(AppError::Store(StoreError::Unavailable(_)))
    ));
}

#[tokio::test]
async fn test_cache_hit_survives_store_outage() {
    let h = harness(CountingStore {
        unavailable: true,
        ..CountingStore::default()
    })
    .await;
    let lesson = add_lesson(&h.store).await;
    h.cache
        .set_lesson(lesson.id.clone(), lesson.clone(), Expiration::Default)
        .await;

    assert_eq!(h.coordinator.view_lesson(&lesson.id).await.unwrap(), lesson);
    assert_eq!(h.store.lesson_lookups.load(Ordering::SeqCst), 0);
}

// == End-to-end Expiry Scenario ==

#[tokio::test(start_paused = true)]
async fn test_end_to_end_expiry_and_sweep() {
    let h = harness(CountingStore::default()).await;
    let course = Course {
        id: "c1".to_string(),
        title: "Course A".to_string(),
        description: "First course".to_string(),
        lessons: vec![],
    };

    let sweeper = spawn_cleanup_task(h.cache.clone(), Duration::from_secs(90)).unwrap();

    // t = 0
    h.cache.set_course("c1", course.clone(), Expiration::Default).await;

    // t = 30s
    h.clock.advance(Duration::from_secs(30));
    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(h.cache.get_course("c1").await, Ok(course));

    // t = 61s
    h.clock.advance(Duration::from_secs(31));
    tokio::time::advance(Duration::from_secs(31)).await;
    assert_eq!(
        h.cache.get_course("c1").await,
        Err(CacheError::Expired("c1".to_string()))
    );
    assert!(h.cache.contains_entry::<Course>("c1").await);

    // t = 95s, one sweep has run at t = 90s
    h.clock.advance(Duration::from_secs(34));
    tokio::time::advance(Duration::from_secs(34)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!h.cache.contains_entry::<Course>("c1").await);
    assert_eq!(
        h.cache.get_course("c1").await,
        Err(CacheError::NotFound("c1".to_string()))
    );

    sweeper.shutdown().await;
}
