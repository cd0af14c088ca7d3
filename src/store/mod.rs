//! Event Store module
//!
//! Persistence layer for tracked events in PostgreSQL.

mod repository;

pub use repository::{DeleteOutcome, EventStore};
