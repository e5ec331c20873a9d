//! Access Coordinator
//!
//! The bot's command handlers. Every read of a single record goes through the
//! cache first and falls back to the record store; writes go straight to the
//! store.
//!
//! Writes do not touch the cache, so a cached user keeps showing its old
//! course list until the entry expires.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::auth::PasswordVerifier;
use crate::cache::{CacheRecord, Expiration, ExpiringCache};
use crate::db::RecordStore;
use crate::error::{AppError, Result, StoreError};
use crate::models::{Course, Lesson, User};

/// Runs the bot's commands against the cache and the record store.
#[derive(Debug, Clone)]
pub struct AccessCoordinator {
    cache: ExpiringCache,
    store: Arc<dyn RecordStore>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl AccessCoordinator {
    pub fn new(
        cache: ExpiringCache,
        store: Arc<dyn RecordStore>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            cache,
            store,
            passwords,
        }
    }

    /// The cache this coordinator reads through.
    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    // == Cache-aside Read ==
    /// Returns the cached record for `key`, or loads it from the store and
    /// caches it with the default expiration.
    ///
    /// Cache misses and expired entries are never errors here; only the
    /// store's answer can fail the read.
    async fn read_through<R, F, Fut>(&self, key: &str, load: F) -> std::result::Result<R, StoreError>
    where
        R: CacheRecord,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<R, StoreError>>,
    {
        if let Ok(value) = self.cache.get::<R>(key).await {
            return Ok(value);
        }

        let value = load().await?;
        self.cache.set(key, value.clone(), Expiration::Default).await;
        debug!(kind = %R::KIND, key, "cache populated from store");
        Ok(value)
    }

    async fn user_for_chat(&self, chat_id: i64) -> Result<User> {
        let key = chat_id.to_string();
        self.read_through(&key, || self.store.get_user_by_chat(chat_id))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => AppError::NotAuthenticated(chat_id),
                other => AppError::Store(other),
            })
    }

    async fn course(&self, course_id: &str) -> Result<Course> {
        self.read_through(course_id, || self.store.get_course(course_id))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => AppError::CourseNotFound(course_id.to_string()),
                other => AppError::Store(other),
            })
    }

    // == Commands ==
    /// Authenticates `email` and binds the account to `chat_id`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, chat_id: i64) -> Result<User> {
        let mut user = self
            .read_through(email, || self.store.get_user(email))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => AppError::UserNotFound(email.to_string()),
                other => AppError::Store(other),
            })?;

        if !self.passwords.verify(password, &user.password) {
            warn!("rejected login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.store.update_user_chat(&user.email, chat_id).await?;
        user.chat_id = Some(chat_id);
        info!("user logged in");
        Ok(user)
    }

    /// Lists every course offered.
    pub async fn courses(&self) -> Result<Vec<Course>> {
        Ok(self.store.list_courses().await?)
    }

    /// Lists the courses the user in `chat_id` registered for.
    #[instrument(skip(self))]
    pub async fn my_courses(&self, chat_id: i64) -> Result<Vec<Course>> {
        let user = self.user_for_chat(chat_id).await?;
        let user_chat = user.chat_id.unwrap_or(chat_id);

        match self.store.get_user_courses(user_chat).await {
            Ok(courses) => Ok(courses),
            Err(StoreError::NotFound(_)) => Err(AppError::NotAuthenticated(chat_id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Registers the user in `chat_id` for a course.
    #[instrument(skip(self))]
    pub async fn register_for_course(&self, chat_id: i64, course_id: &str) -> Result<Course> {
        let user = self.user_for_chat(chat_id).await?;
        let course = self.course(course_id).await?;

        match self
            .store
            .add_user_course(user.chat_id.unwrap_or(chat_id), course.clone())
            .await
        {
            Ok(()) => {
                info!(title = %course.title, "registered for course");
                Ok(course)
            }
            Err(StoreError::NotFound(_)) => Err(AppError::NotAuthenticated(chat_id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Lists a course's lessons in order.
    pub async fn course_lessons(&self, course_id: &str) -> Result<Vec<Lesson>> {
        self.store
            .get_course_lessons(course_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => AppError::CourseNotFound(course_id.to_string()),
                other => AppError::Store(other),
            })
    }

    /// Returns a single lesson.
    pub async fn view_lesson(&self, lesson_id: &str) -> Result<Lesson> {
        self.read_through(lesson_id, || self.store.get_lesson(lesson_id))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => AppError::LessonNotFound(lesson_id.to_string()),
                other => AppError::Store(other),
            })
    }
}
