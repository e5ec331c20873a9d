//! Records and request/response models
//!
//! The record types are what the store persists and the cache holds; the
//! DTOs shape the HTTP bodies of the command API.

pub mod records;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use records::{Course, Lesson, NewLesson, User};
pub use requests::LoginRequest;
pub use responses::{
    CourseSummary, HealthResponse, LessonSummary, LoginResponse, RegistrationResponse,
    StatsResponse,
};
