//! Course bot backend
//!
//! Serves a course-browsing bot's commands with an expiring in-memory cache
//! in front of the record store.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use coordinator::AccessCoordinator;
pub use tasks::spawn_cleanup_task;
