//! CSV Importer
//!
//! Parses spreadsheet exports from the external forms tool into insert
//! records. This is a pure text-to-records transform: persistence stays with
//! the caller, which keeps the parser testable from raw text alone.
//!
//! The first row is a header and is not validated; columns are consumed
//! positionally (Timestamp, Event Type, Location, Who for events; Timestamp
//! for toothbrush). Each data row parses independently: one malformed row
//! becomes a `RowError` and never aborts the rest of the file.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::domain::{EventType, Location, NewEvent, NewToothbrushEvent};

/// Timestamp format accepted in import files
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which table an import file targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Events,
    Toothbrush,
}

impl std::str::FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "events" => Ok(ImportKind::Events),
            "toothbrush" => Ok(ImportKind::Toothbrush),
            other => Err(format!("unknown import kind: {other}")),
        }
    }
}

/// A row that failed to parse. `row` is the 1-based data-row index
/// (the header is row 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

/// Outcome of parsing one import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport<T> {
    /// Successfully parsed records, in file order
    pub records: Vec<T>,
    /// Count of successfully parsed rows, not total lines read
    pub rows_processed: usize,
    /// Per-row failures, in file order
    pub row_errors: Vec<RowError>,
}

impl<T> Default for ImportReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rows_processed: 0,
            row_errors: Vec::new(),
        }
    }
}

/// Parse an events export: Timestamp, Event Type, Location, Who.
pub fn parse_events(contents: &str) -> ImportReport<NewEvent> {
    parse_rows(contents, parse_event_row)
}

/// Parse a toothbrush export: Timestamp only.
pub fn parse_toothbrush(contents: &str) -> ImportReport<NewToothbrushEvent> {
    parse_rows(contents, parse_toothbrush_row)
}

fn parse_rows<T>(
    contents: &str,
    parse_row: fn(&csv::StringRecord) -> Result<T, String>,
) -> ImportReport<T> {
    let mut report = ImportReport::default();

    if contents.trim().is_empty() {
        report.row_errors.push(RowError {
            row: 0,
            reason: "empty file".to_string(),
        });
        return report;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let outcome = match result {
            Ok(record) => parse_row(&record),
            Err(e) => Err(format!("unreadable row: {e}")),
        };
        match outcome {
            Ok(record) => {
                report.records.push(record);
                report.rows_processed += 1;
            }
            Err(reason) => report.row_errors.push(RowError { row, reason }),
        }
    }

    report
}

fn parse_timestamp(field: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(field.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("bad timestamp: {field:?} (expected YYYY-MM-DD HH:MM:SS)"))
}

fn parse_event_row(record: &csv::StringRecord) -> Result<NewEvent, String> {
    let timestamp = parse_timestamp(record.get(0).unwrap_or(""))?;

    let type_field = record.get(1).unwrap_or("").trim();
    let event_type: EventType = type_field
        .parse()
        .map_err(|_| format!("bad event type: {type_field:?}"))?;

    let location_field = record.get(2).unwrap_or("").trim();
    let location: Location = location_field
        .parse()
        .map_err(|_| format!("bad location: {location_field:?}"))?;

    let who = match record.get(3).map(str::trim) {
        Some("") | None => None,
        Some(name) => Some(name.to_string()),
    };

    Ok(NewEvent {
        event_type,
        location,
        who,
        timestamp,
    })
}

fn parse_toothbrush_row(record: &csv::StringRecord) -> Result<NewToothbrushEvent, String> {
    let timestamp = parse_timestamp(record.get(0).unwrap_or(""))?;

    Ok(NewToothbrushEvent {
        timestamp,
        used_irrigator: false,
    })
}
