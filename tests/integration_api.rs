//! API Integration Tests
//!
//! End-to-end tests over the axum router against a live PostgreSQL.
//! Run with `cargo test -- --ignored` after pointing DATABASE_URL at a
//! scratch database.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use habit_log::api;

mod common;

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_submit_and_stats_e2e() {
    let pool = common::setup_test_db().await;
    let app = api::create_router().with_state(pool.clone());

    // 1. Record an event with an explicit timestamp of "now"
    let now = chrono::Utc::now().to_rfc3339();
    let req = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header("content-type", "application/json")
        .body(Body::from(format!(
            r#"{{"event_type":"pee","location":"home","who":"Alice","timestamp":"{now}"}}"#
        )))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Event submit failed");

    // 2. Record a toothbrushing
    let req = Request::builder()
        .method("POST")
        .uri("/api/toothbrush")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"used_irrigator":true}"#))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Toothbrush submit failed");

    // 3. Listing returns both streams, newest first
    let req = Request::builder()
        .method("GET")
        .uri("/api/data")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
    assert_eq!(json["events"][0]["who"], "Alice");
    assert_eq!(json["toothbrush"].as_array().unwrap().len(), 1);
    assert_eq!(json["toothbrush"][0]["used_irrigator"], true);

    // 4. Stats count both under "today"
    let req = Request::builder()
        .method("GET")
        .uri("/api/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["today"]["pee"], 1);
    assert_eq!(json["today"]["toothbrush"], 1);
    assert_eq!(json["all_time"]["total_days"], 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_delete_is_idempotent() {
    let pool = common::setup_test_db().await;
    let app = api::create_router().with_state(pool.clone());

    // Create an event to delete
    let req = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"event_type":"poo","location":"work"}"#))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let id = json["id"].as_i64().unwrap();

    // First delete removes the row
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/events/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "deleted");

    // Second delete is a no-op, not an error
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/events/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "not_found");

    // Store is unchanged
    let req = Request::builder()
        .method("GET")
        .uri("/api/data")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_import_partial_failure() {
    let pool = common::setup_test_db().await;
    let app = api::create_router().with_state(pool.clone());

    let csv = "Timestamp,Event Type,Location,Who\n\
               2023-12-01 14:30:00,pee,home,Alice\n\
               garbage,pee,home,Bob\n\
               2023-12-02 09:00:00,poo,work,\n";
    let req = Request::builder()
        .method("POST")
        .uri("/api/import/events")
        .header("content-type", "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["rows_processed"], 2);
    assert_eq!(json["inserted"], 2);
    assert_eq!(json["row_errors"].as_array().unwrap().len(), 1);
    assert_eq!(json["row_errors"][0]["row"], 2);

    // Both good rows landed in the store
    let req = Request::builder()
        .method("GET")
        .uri("/api/data")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["events"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_import_unknown_kind_is_bad_request() {
    let pool = common::setup_test_db().await;
    let app = api::create_router().with_state(pool.clone());

    let req = Request::builder()
        .method("POST")
        .uri("/api/import/users")
        .header("content-type", "text/csv")
        .body(Body::from("Timestamp\n2023-12-01 07:00:00\n"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
