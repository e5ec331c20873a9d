//! Response DTOs for the bot command API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Course, Lesson};

/// Response body for the login command (POST /login)
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Success message
    pub message: String,
    pub email: String,
    pub chat_id: i64,
}

impl LoginResponse {
    /// Creates a new LoginResponse
    pub fn new(email: impl Into<String>, chat_id: i64) -> Self {
        Self {
            message: "Login successful".to_string(),
            email: email.into(),
            chat_id,
        }
    }
}

/// One entry of a course listing (GET /courses, GET /users/:chat_id/courses)
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub lesson_count: usize,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            lesson_count: course.lessons.len(),
        }
    }
}

/// One entry of a course's lesson list (GET /courses/:course_id/lessons)
#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    /// 1-based position of the lesson within the course
    pub number: usize,
    pub id: String,
    pub title: String,
}

impl LessonSummary {
    /// Numbers lessons in course order, starting from 1.
    pub fn numbered(lessons: &[Lesson]) -> Vec<Self> {
        lessons
            .iter()
            .enumerate()
            .map(|(i, lesson)| Self {
                number: i + 1,
                id: lesson.id.clone(),
                title: lesson.title.clone(),
            })
            .collect()
    }
}

/// Response body for a course registration (POST /users/:chat_id/courses/:course_id)
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    /// Success message
    pub message: String,
    pub course_id: String,
}

impl RegistrationResponse {
    /// Creates a new RegistrationResponse
    pub fn new(course: &Course) -> Self {
        Self {
            message: format!("Registered for '{}'", course.title),
            course_id: course.id.clone(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of lookups for keys that were never cached
    pub misses: u64,
    /// Number of lookups that found an expired entry
    pub expired: u64,
    pub users: usize,
    pub courses: usize,
    pub lessons: usize,
    /// Entries held across all kinds, including expired ones not yet swept
    pub total_entries: usize,
    /// Hit rate (hits / all lookups)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            users: stats.users,
            courses: stats.courses,
            lessons: stats.lessons,
            total_entries: stats.total_entries(),
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
