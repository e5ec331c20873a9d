//! Record types held by the store and the cache

use serde::{Deserialize, Serialize};

/// A student account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Chat the account logged in from, if any
    #[serde(default)]
    pub chat_id: Option<i64>,
    pub email: String,
    /// Password hash, never sent back to clients
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Courses the user registered for
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// A course and the lessons it is made of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A single lesson: a lecture link, a task link and a time estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub lecture: String,
    pub task: String,
    pub estimated_minutes: u32,
}

/// Fields needed to create a lesson; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLesson {
    pub title: String,
    pub lecture: String,
    pub task: String,
    pub estimated_minutes: u32,
}

impl NewLesson {
    /// Attaches a store-assigned id.
    pub fn into_lesson(self, id: String) -> Lesson {
        Lesson {
            id,
            title: self.title,
            lecture: self.lecture,
            task: self.task,
            estimated_minutes: self.estimated_minutes,
        }
    }
}
