//! API Handlers
//!
//! HTTP request handlers, one per bot command plus stats and health.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::coordinator::AccessCoordinator;
use crate::error::{AppError, Result};
use crate::models::{
    CourseSummary, HealthResponse, Lesson, LessonSummary, LoginRequest, LoginResponse,
    RegistrationResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub coordinator: AccessCoordinator,
}

impl AppState {
    /// Creates a new AppState around the command coordinator.
    pub fn new(coordinator: AccessCoordinator) -> Self {
        Self { coordinator }
    }
}

/// Handler for POST /login
///
/// Authenticates a user and binds the account to the chat.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let user = state
        .coordinator
        .login(req.email.trim(), &req.password, req.chat_id)
        .await?;

    Ok(Json(LoginResponse::new(user.email, req.chat_id)))
}

/// Handler for GET /courses
pub async fn courses_handler(State(state): State<AppState>) -> Result<Json<Vec<CourseSummary>>> {
    let courses = state.coordinator.courses().await?;
    Ok(Json(courses.iter().map(CourseSummary::from).collect()))
}

/// Handler for GET /users/:chat_id/courses
pub async fn my_courses_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<CourseSummary>>> {
    let courses = state.coordinator.my_courses(chat_id).await?;
    Ok(Json(courses.iter().map(CourseSummary::from).collect()))
}

/// Handler for POST /users/:chat_id/courses/:course_id
pub async fn register_handler(
    State(state): State<AppState>,
    Path((chat_id, course_id)): Path<(i64, String)>,
) -> Result<Json<RegistrationResponse>> {
    let course = state
        .coordinator
        .register_for_course(chat_id, &course_id)
        .await?;
    Ok(Json(RegistrationResponse::new(&course)))
}

/// Handler for GET /courses/:course_id/lessons
pub async fn course_lessons_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<LessonSummary>>> {
    let lessons = state.coordinator.course_lessons(&course_id).await?;
    Ok(Json(LessonSummary::numbered(&lessons)))
}

/// Handler for GET /lessons/:lesson_id
pub async fn lesson_handler(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<Lesson>> {
    let lesson = state.coordinator.view_lesson(&lesson_id).await?;
    Ok(Json(lesson))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.coordinator.cache().stats().await;
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
