//! Seed data for a fresh store
//!
//! A JSON document listing accounts and courses (with their lessons) to
//! create at startup.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::auth::PasswordVerifier;
use crate::db::RecordStore;
use crate::models::NewLesson;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub courses: Vec<SeedCourse>,
}

/// An account with a plain-text password, hashed on load.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCourse {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<NewLesson>,
}

impl Seed {
    /// Reads a seed document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    /// Creates every lesson, course and user of the seed in `store`.
    pub async fn apply(
        &self,
        store: &dyn RecordStore,
        passwords: &dyn PasswordVerifier,
    ) -> anyhow::Result<()> {
        for course in &self.courses {
            let mut lessons = Vec::with_capacity(course.lessons.len());
            for lesson in &course.lessons {
                lessons.push(store.create_lesson(lesson.clone()).await?);
            }
            store
                .create_course(&course.title, &course.description, lessons)
                .await?;
        }

        for user in &self.users {
            let hash = passwords
                .hash(&user.password)
                .with_context(|| format!("hashing password for {}", user.email))?;
            store.create_user(&user.email, &hash).await?;
        }

        info!(
            "Seeded {} courses and {} users",
            self.courses.len(),
            self.users.len()
        );
        Ok(())
    }
}
