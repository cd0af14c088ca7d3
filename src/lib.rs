//! habit_log Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod domain;
pub mod import;
pub mod stats;
pub mod store;

pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Event, EventType, Location, NewEvent, NewToothbrushEvent, ToothbrushEvent};
pub use stats::{compute_stats, StatsSnapshot};
