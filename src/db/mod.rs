//! Record store abstraction
//!
//! The authoritative storage for users, courses and lessons. The cache sits
//! in front of it; the store never calls back into the cache.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{Seed, SeedCourse, SeedUser};

use crate::error::StoreResult;
use crate::models::{Course, Lesson, NewLesson, User};

/// Trait for pluggable record store backends.
///
/// Lookups are idempotent and return records with stable ids. Missing
/// records are reported as `StoreError::NotFound`; anything else the backend
/// cannot serve is `StoreError::Unavailable`.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates an account. `password_hash` is stored as given.
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    /// Looks up a user by email.
    async fn get_user(&self, email: &str) -> StoreResult<User>;

    /// Looks up the user bound to a chat.
    async fn get_user_by_chat(&self, chat_id: i64) -> StoreResult<User>;

    /// Binds a user to the chat they logged in from.
    async fn update_user_chat(&self, email: &str, chat_id: i64) -> StoreResult<()>;

    /// Returns the courses of the user bound to `chat_id`.
    async fn get_user_courses(&self, chat_id: i64) -> StoreResult<Vec<Course>>;

    /// Adds a course to a user's list. Adding a course twice keeps one copy.
    async fn add_user_course(&self, chat_id: i64, course: Course) -> StoreResult<()>;

    async fn get_course(&self, id: &str) -> StoreResult<Course>;

    /// Returns every course in creation order.
    async fn list_courses(&self) -> StoreResult<Vec<Course>>;

    async fn create_course(
        &self,
        title: &str,
        description: &str,
        lessons: Vec<Lesson>,
    ) -> StoreResult<Course>;

    /// Returns the lessons of a course in course order.
    async fn get_course_lessons(&self, course_id: &str) -> StoreResult<Vec<Lesson>>;

    async fn create_lesson(&self, lesson: NewLesson) -> StoreResult<Lesson>;

    async fn get_lesson(&self, id: &str) -> StoreResult<Lesson>;
}

impl std::fmt::Debug for dyn RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordStore")
    }
}
