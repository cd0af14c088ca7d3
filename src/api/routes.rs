//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::domain::{Event, EventType, Location, NewEvent, NewToothbrushEvent, ToothbrushEvent};
use crate::error::AppError;
use crate::import::{self, ImportKind, RowError};
use crate::stats::{self, StatsSnapshot};
use crate::store::{DeleteOutcome, EventStore};

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitEventRequest {
    pub event_type: EventType,
    pub location: Location,
    #[serde(default)]
    pub who: Option<String>,
    /// Defaults to the server clock when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitToothbrushRequest {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_irrigator: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub events: Vec<Event>,
    pub toothbrush: Vec<ToothbrushEvent>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub rows_processed: usize,
    pub inserted: usize,
    pub row_errors: Vec<RowError>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        .route("/", get(root_status))
        .route("/health", get(health_check))
        .route("/test-db", get(test_db))
        .route("/api/events", post(submit_event))
        .route("/api/events/:id", delete(delete_event))
        .route("/api/toothbrush", post(submit_toothbrush))
        .route("/api/data", get(get_data))
        .route("/api/stats", get(get_stats))
        .route("/api/import/:kind", post(import_csv))
}

/// Root status endpoint
async fn root_status() -> Json<Value> {
    Json(json!({ "status": "backend running" }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Database connectivity check
async fn test_db(State(pool): State<PgPool>) -> Result<Json<Value>, AppError> {
    crate::db::verify_connection(&pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}

// =========================================================================
// POST /api/events
// =========================================================================

/// Record a bodily event
async fn submit_event(
    State(pool): State<PgPool>,
    Json(request): Json<SubmitEventRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let store = EventStore::new(pool);

    let record = NewEvent {
        event_type: request.event_type,
        location: request.location,
        who: request.who.filter(|w| !w.trim().is_empty()),
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
    };

    let id = store.insert_event(&record).await?;

    tracing::debug!(id, event_type = %record.event_type, "Event recorded");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            status: "success".to_string(),
            id,
        }),
    ))
}

// =========================================================================
// POST /api/toothbrush
// =========================================================================

/// Record a toothbrushing event
async fn submit_toothbrush(
    State(pool): State<PgPool>,
    Json(request): Json<SubmitToothbrushRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let store = EventStore::new(pool);

    let record = NewToothbrushEvent {
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
        used_irrigator: request.used_irrigator,
    };

    let id = store.insert_toothbrush(&record).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            status: "success".to_string(),
            id,
        }),
    ))
}

// =========================================================================
// GET /api/data
// =========================================================================

/// List both streams, newest first
async fn get_data(State(pool): State<PgPool>) -> Result<Json<DataResponse>, AppError> {
    let store = EventStore::new(pool);

    let events = store.list_events().await?;
    let toothbrush = store.list_toothbrush().await?;

    Ok(Json(DataResponse { events, toothbrush }))
}

// =========================================================================
// GET /api/stats
// =========================================================================

/// Compute the statistics snapshot over the full dataset
async fn get_stats(State(pool): State<PgPool>) -> Result<Json<StatsSnapshot>, AppError> {
    let store = EventStore::new(pool);

    let events = store.list_events().await?;
    let toothbrush = store.list_toothbrush().await?;

    let snapshot = stats::compute_stats(&events, &toothbrush, Utc::now())?;

    Ok(Json(snapshot))
}

// =========================================================================
// DELETE /api/events/:id
// =========================================================================

/// Delete an event by id. A missing id is a no-op, reported as such.
async fn delete_event(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    let store = EventStore::new(pool);

    let status = match store.delete_event(id).await? {
        DeleteOutcome::Deleted => "deleted",
        DeleteOutcome::NotFound => "not_found",
    };

    Ok(Json(DeleteResponse {
        status: status.to_string(),
    }))
}

// =========================================================================
// POST /api/import/:kind
// =========================================================================

/// Import a CSV export from the forms tool. The body is raw CSV text;
/// parsed records are inserted one by one, and per-row failures ride back
/// in the response instead of aborting the import.
async fn import_csv(
    State(pool): State<PgPool>,
    Path(kind): Path<String>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let kind: ImportKind = kind.parse().map_err(AppError::InvalidRequest)?;
    let store = EventStore::new(pool);

    let response = match kind {
        ImportKind::Events => {
            let report = import::parse_events(&body);
            let mut inserted = 0;
            for record in &report.records {
                store.insert_event(record).await?;
                inserted += 1;
            }
            ImportResponse {
                rows_processed: report.rows_processed,
                inserted,
                row_errors: report.row_errors,
            }
        }
        ImportKind::Toothbrush => {
            let report = import::parse_toothbrush(&body);
            let mut inserted = 0;
            for record in &report.records {
                store.insert_toothbrush(record).await?;
                inserted += 1;
            }
            ImportResponse {
                rows_processed: report.rows_processed,
                inserted,
                row_errors: report.row_errors,
            }
        }
    };

    tracing::info!(
        rows_processed = response.rows_processed,
        errors = response.row_errors.len(),
        "CSV import finished"
    );

    Ok(Json(response))
}
