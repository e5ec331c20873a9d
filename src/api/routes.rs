//! API Routes
//!
//! Configures the Axum router with all bot command endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    course_lessons_handler, courses_handler, health_handler, lesson_handler, login_handler,
    my_courses_handler, register_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /login` - Log in and bind the account to a chat
/// - `GET /courses` - All courses
/// - `GET /courses/:course_id/lessons` - A course's lessons
/// - `GET /lessons/:lesson_id` - A single lesson
/// - `GET /users/:chat_id/courses` - Courses the chat's user registered for
/// - `POST /users/:chat_id/courses/:course_id` - Register for a course
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(login_handler))
        .route("/courses", get(courses_handler))
        .route("/courses/:course_id/lessons", get(course_lessons_handler))
        .route("/lessons/:lesson_id", get(lesson_handler))
        .route("/users/:chat_id/courses", get(my_courses_handler))
        .route("/users/:chat_id/courses/:course_id", post(register_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
