//! Event Store Repository
//!
//! Single-writer CRUD over the events and toothbrush_events tables.
//! Concurrency control lives entirely in PostgreSQL: concurrent inserts
//! and deletes on distinct ids cannot corrupt the dataset, and deleting a
//! missing id is a no-op.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Event, NewEvent, NewToothbrushEvent, ToothbrushEvent};

/// Result of a delete-by-id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Event Store for persisting and listing tracked events
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Create a new EventStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a bodily event, returning its assigned id
    pub async fn insert_event(&self, record: &NewEvent) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (event_type, location, who, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(record.event_type.as_str())
        .bind(record.location.as_str())
        .bind(record.who.as_deref())
        .bind(record.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Insert a toothbrushing event, returning its assigned id
    pub async fn insert_toothbrush(
        &self,
        record: &NewToothbrushEvent,
    ) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO toothbrush_events (timestamp, used_irrigator)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(record.timestamp)
        .bind(record.used_irrigator)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// List all bodily events, newest first
    pub async fn list_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        let rows: Vec<(i64, String, String, Option<String>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, event_type, location, who, timestamp
            FROM events
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, event_type, location, who, timestamp)| Event {
                id,
                event_type,
                location,
                who,
                timestamp,
            })
            .collect())
    }

    /// List all toothbrushing events, newest first
    pub async fn list_toothbrush(&self) -> Result<Vec<ToothbrushEvent>, sqlx::Error> {
        let rows: Vec<(i64, DateTime<Utc>, bool)> = sqlx::query_as(
            r#"
            SELECT id, timestamp, used_irrigator
            FROM toothbrush_events
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, timestamp, used_irrigator)| ToothbrushEvent {
                id,
                timestamp,
                used_irrigator,
            })
            .collect())
    }

    /// Delete a bodily event by id. Idempotent: a missing id reports
    /// `NotFound` and leaves the store unchanged.
    pub async fn delete_event(&self, id: i64) -> Result<DeleteOutcome, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
