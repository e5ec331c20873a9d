//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each bot command endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use coursebot::api::create_router;
use coursebot::auth::BcryptVerifier;
use coursebot::cache::{CacheSettings, ExpiringCache};
use coursebot::db::{MemoryStore, Seed};
use coursebot::{AccessCoordinator, AppState};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

const SEED: &str = r#"{
    "users": [{"email": "student@school.test", "password": "student"}],
    "courses": [
        {
            "title": "Higher mathematics",
            "description": "Calculus for university students",
            "lessons": [
                {"title": "Introduction", "lecture": "https://video.test/intro", "task": "https://forms.test/intro", "estimated_minutes": 90},
                {"title": "Integrals", "lecture": "https://video.test/int", "task": "https://forms.test/int", "estimated_minutes": 75}
            ]
        },
        {
            "title": "Biology",
            "description": "Cells and tissues",
            "lessons": []
        }
    ]
}"#;

async fn create_test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let seed: Seed = serde_json::from_str(SEED).unwrap();
    let passwords = BcryptVerifier::new(4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */);
    seed.apply(store.as_ref(), &passwords).await.unwrap();

    let cache = ExpiringCache::new(CacheSettings::default());
    let coordinator = AccessCoordinator::new(cache, store, Arc::new(passwords));
    create_router(AppState::new(coordinator))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn login(app: &Router, chat_id: i64) -> StatusCode {
    let body = format!(
        r#"{{"email":"student@school.test","password":"student","chat_id":{}}}"#,
        chat_id
    );
    send(app, "POST", "/login", Some(&body)).await.0
}

// == Login ==

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app().await;

    let (status, json) = send(
        &app,
        "POST",
        "/login",
        Some(r#"{"email":"student@school.test","password":"student","chat_id":5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "student@school.test");
    assert_eq!(json["chat_id"], 5);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = create_test_app().await;

    let (status, json) = send(
        &app,
        "POST",
        "/login",
        Some(r#"{"email":"ghost@school.test","password":"x","chat_id":5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("ghost@school.test"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        Some(r#"{"email":"student@school.test","password":"nope","chat_id":5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_arguments() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        Some(r#"{"email":"","password":"student","chat_id":5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Courses and Lessons ==

#[tokio::test]
async fn test_list_courses() {
    let app = create_test_app().await;

    let (status, json) = send(&app, "GET", "/courses", None).await;

    assert_eq!(status, StatusCode::OK);
    let courses = json.as_array().unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0]["title"], "Higher mathematics");
    assert_eq!(courses[0]["lesson_count"], 2);
}

#[tokio::test]
async fn test_course_lessons_and_view() {
    let app = create_test_app().await;
    let (_, courses) = send(&app, "GET", "/courses", None).await;
    let course_id = courses[0]["id"].as_str().unwrap().to_string();

    let (status, lessons) = send(&app, "GET", &format!("/courses/{}/lessons", course_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lessons[1]["number"], 2);
    assert_eq!(lessons[1]["title"], "Integrals");

    let lesson_id = lessons[1]["id"].as_str().unwrap().to_string();
    let (status, lesson) = send(&app, "GET", &format!("/lessons/{}", lesson_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lesson["estimated_minutes"], 75);
    assert_eq!(lesson["task"], "https://forms.test/int");
}

#[tokio::test]
async fn test_course_lessons_unknown_course() {
    let app = create_test_app().await;

    let (status, _) = send(&app, "GET", "/courses/missing/lessons", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Registration ==

#[tokio::test]
async fn test_register_and_my_courses() {
    let app = create_test_app().await;
    assert_eq!(login(&app, 8).await, StatusCode::OK);

    let (_, courses) = send(&app, "GET", "/courses", None).await;
    let course_id = courses[1]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "POST", &format!("/users/8/courses/{}", course_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["course_id"], course_id.as_str());

    let (status, mine) = send(&app, "GET", "/users/8/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], "Biology");
}

#[tokio::test]
async fn test_register_requires_login() {
    let app = create_test_app().await;

    let (status, _) = send(&app, "POST", "/users/8/courses/anything", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_unknown_course() {
    let app = create_test_app().await;
    assert_eq!(login(&app, 8).await, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/users/8/courses/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Stats and Health ==

#[tokio::test]
async fn test_stats_reflect_cache_activity() {
    let app = create_test_app().await;
    assert_eq!(login(&app, 8).await, StatusCode::OK);
    assert_eq!(login(&app, 8).await, StatusCode::OK);

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["users"], 1);
    assert_eq!(json["expired"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
