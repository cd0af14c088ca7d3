//! Statistics Aggregator
//!
//! Pure rollup over the full event and toothbrush lists. Recomputed on every
//! request; nothing here touches the database or holds state between calls.
//!
//! Windows:
//! - "today" is a calendar-date match against `now`, not a rolling 24h span.
//! - "weekly" is a rolling `now - 7 days` window; daily averages always
//!   divide by a fixed 7, even for datasets younger than a week.
//! - "all-time" divides by `max(1, whole days since the earliest record)`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{Event, EventType, ToothbrushEvent};

/// Errors from the aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// A record timestamp the rollup cannot place. Surfaced instead of
    /// skipped so upstream data corruption is visible, not masked.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Per-category event counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub pee: u64,
    pub poo: u64,
    pub cum: u64,
    pub toothbrush: u64,
}

impl CategoryCounts {
    fn record(&mut self, kind: EventType) {
        match kind {
            EventType::Pee => self.pee += 1,
            EventType::Poo => self.poo += 1,
            EventType::Cum => self.cum += 1,
        }
    }
}

/// Per-category daily averages, rounded to one decimal place
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryAverages {
    pub pee: f64,
    pub poo: f64,
    pub cum: f64,
    pub toothbrush: f64,
}

impl CategoryAverages {
    fn from_counts(counts: &CategoryCounts, days: f64) -> Self {
        Self {
            pee: round1(counts.pee as f64 / days),
            poo: round1(counts.poo as f64 / days),
            cum: round1(counts.cum as f64 / days),
            toothbrush: round1(counts.toothbrush as f64 / days),
        }
    }
}

/// Rolling 7-day totals and averages
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub totals: CategoryCounts,
    pub daily_average: CategoryAverages,
}

/// Lifetime averages over the tracked period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AllTimeStats {
    pub daily_average: CategoryAverages,
    pub total_days: i64,
    pub first_event_date: Option<DateTime<Utc>>,
}

/// Derived statistics view as of `now`; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub today: CategoryCounts,
    pub weekly: WeeklyStats,
    pub all_time: AllTimeStats,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the full statistics snapshot as of `now`.
///
/// Events whose `event_type` falls outside the closed enum contribute to no
/// category. The hidden-category toggle in the client never reaches this
/// layer; `cum` is always counted.
///
/// # Errors
/// `StatsError::InvalidRecord` when a record timestamp breaks the window
/// arithmetic (degenerate values outside the representable date range).
pub fn compute_stats(
    events: &[Event],
    toothbrush: &[ToothbrushEvent],
    now: DateTime<Utc>,
) -> Result<StatsSnapshot, StatsError> {
    let today = now.date_naive();
    let week_start = now
        .checked_sub_signed(Duration::days(7))
        .ok_or_else(|| StatsError::InvalidRecord(format!("now out of range: {now}")))?;

    let mut today_counts = CategoryCounts::default();
    let mut weekly_totals = CategoryCounts::default();
    let mut all_time_totals = CategoryCounts::default();
    let mut first: Option<DateTime<Utc>> = None;

    for event in events {
        first = Some(first.map_or(event.timestamp, |f| f.min(event.timestamp)));
        let Some(kind) = event.kind() else {
            // Out-of-range event_type text: excluded, not fatal
            continue;
        };
        all_time_totals.record(kind);
        if event.timestamp >= week_start {
            weekly_totals.record(kind);
        }
        if event.timestamp.date_naive() == today {
            today_counts.record(kind);
        }
    }

    for brush in toothbrush {
        first = Some(first.map_or(brush.timestamp, |f| f.min(brush.timestamp)));
        all_time_totals.toothbrush += 1;
        if brush.timestamp >= week_start {
            weekly_totals.toothbrush += 1;
        }
        if brush.timestamp.date_naive() == today {
            today_counts.toothbrush += 1;
        }
    }

    // Whole days elapsed since the earliest record, clamped to at least one
    // so a brand-new dataset never divides by zero.
    let total_days = match first {
        Some(first_ts) => now
            .signed_duration_since(first_ts)
            .num_days()
            .max(1),
        None => 1,
    };

    Ok(StatsSnapshot {
        today: today_counts,
        weekly: WeeklyStats {
            totals: weekly_totals,
            daily_average: CategoryAverages::from_counts(&weekly_totals, 7.0),
        },
        all_time: AllTimeStats {
            daily_average: CategoryAverages::from_counts(&all_time_totals, total_days as f64),
            total_days,
            first_event_date: first,
        },
    })
}
