//! API Module
//!
//! HTTP surface through which a chat transport invokes the bot's commands.
//!
//! # Endpoints
//! - `POST /login` - Log in from a chat
//! - `GET /courses` - All courses
//! - `GET /courses/:course_id/lessons` - A course's lessons
//! - `GET /lessons/:lesson_id` - A single lesson
//! - `GET /users/:chat_id/courses` - The chat user's courses
//! - `POST /users/:chat_id/courses/:course_id` - Register for a course
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
