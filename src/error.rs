//! Error types for the course bot
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Cache Error Enum ==
/// Conditions reported by the expiring cache.
///
/// Neither variant is fatal: both send the caller to the record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No entry was ever stored under the key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// An entry exists but its expiration instant has passed
    #[error("Key expired: {0}")]
    Expired(String),
}

// == Store Error Enum ==
/// Errors returned by a record store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The backend could not serve the request (connectivity, timeout)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A password could not be hashed.
#[derive(Error, Debug)]
#[error("Password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

// == App Error Enum ==
/// Errors surfaced by the bot's command handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Login with an email nobody registered
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No user is bound to the chat
    #[error("Chat {0} is not authenticated")]
    NotAuthenticated(i64),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Lesson not found: {0}")]
    LessonNotFound(String),

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operational failure of the record store
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UserNotFound(_)
            | AppError::CourseNotFound(_)
            | AppError::LessonNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotAuthenticated(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Unavailable(reason)) => {
                error!(reason = %reason, "record store unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for the command handlers.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type returned by record store backends.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
