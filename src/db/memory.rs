//! In-memory record store
//!
//! Backs the binary when no external database is wired in, and the tests.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::RecordStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{Course, Lesson, NewLesson, User};

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by email
    users: HashMap<String, User>,
    /// Chat id to the email of the one user bound to it
    chats: HashMap<i64, String>,
    /// Creation order is the listing order
    courses: Vec<Course>,
    lessons: HashMap<String, Lesson>,
}

/// Record store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let user = User {
            id: new_id(),
            chat_id: None,
            email: email.to_string(),
            password: password_hash.to_string(),
            courses: Vec::new(),
        };

        let mut tables = self.tables.write().await;
        let replaced = tables.users.insert(email.to_string(), user.clone());
        if let Some(chat_id) = replaced.and_then(|old| old.chat_id) {
            tables.chats.remove(&chat_id);
        }
        debug!(email, "user created");
        Ok(user)
    }

    async fn get_user(&self, email: &str) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {}", email)))
    }

    async fn get_user_by_chat(&self, chat_id: i64) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables
            .chats
            .get(&chat_id)
            .and_then(|email| tables.users.get(email))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user for chat {}", chat_id)))
    }

    /// Binds `chat_id` to the user, unbinding whoever held it before.
    async fn update_user_chat(&self, email: &str, chat_id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let Tables { users, chats, .. } = &mut *tables;

        let user = users
            .get_mut(email)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", email)))?;
        if let Some(old_chat) = user.chat_id.replace(chat_id) {
            chats.remove(&old_chat);
        }

        if let Some(previous) = chats.insert(chat_id, email.to_string()) {
            if previous != email {
                if let Some(displaced) = users.get_mut(&previous) {
                    displaced.chat_id = None;
                }
                debug!(chat_id, previous = %previous, email, "chat rebound");
            }
        }
        Ok(())
    }

    async fn get_user_courses(&self, chat_id: i64) -> StoreResult<Vec<Course>> {
        self.get_user_by_chat(chat_id).await.map(|user| user.courses)
    }

    async fn add_user_course(&self, chat_id: i64, course: Course) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let Tables { users, chats, .. } = &mut *tables;
        let user = chats
            .get(&chat_id)
            .and_then(|email| users.get_mut(email))
            .ok_or_else(|| StoreError::NotFound(format!("user for chat {}", chat_id)))?;

        if !user.courses.iter().any(|c| c.id == course.id) {
            user.courses.push(course);
        }
        Ok(())
    }

    async fn get_course(&self, id: &str) -> StoreResult<Course> {
        let tables = self.tables.read().await;
        tables
            .courses
            .iter()
            .find(|course| course.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("course {}", id)))
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        Ok(self.tables.read().await.courses.clone())
    }

    async fn create_course(
        &self,
        title: &str,
        description: &str,
        lessons: Vec<Lesson>,
    ) -> StoreResult<Course> {
        let course = Course {
            id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
            lessons,
        };

        self.tables.write().await.courses.push(course.clone());
        debug!(id = %course.id, title, "course created");
        Ok(course)
    }

    async fn get_course_lessons(&self, course_id: &str) -> StoreResult<Vec<Lesson>> {
        self.get_course(course_id).await.map(|course| course.lessons)
    }

    async fn create_lesson(&self, lesson: NewLesson) -> StoreResult<Lesson> {
        let lesson = lesson.into_lesson(new_id());
        self.tables
            .write()
            .await
            .lessons
            .insert(lesson.id.clone(), lesson.clone());
        Ok(lesson)
    }

    async fn get_lesson(&self, id: &str) -> StoreResult<Lesson> {
        let tables = self.tables.read().await;
        tables
            .lessons
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("lesson {}", id)))
    }
}
