//! Domain Records
//!
//! Stored rows and insert records for the two tracked streams.
//! Writes go through the closed `EventType` / `Location` enums; reads keep
//! the raw database text so legacy rows with out-of-range values still list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of tracked bodily event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Pee,
    Poo,
    Cum,
}

impl EventType {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Pee => "pee",
            EventType::Poo => "poo",
            EventType::Cum => "cum",
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pee" => Ok(EventType::Pee),
            "poo" => Ok(EventType::Poo),
            "cum" => Ok(EventType::Cum),
            other => Err(UnknownValue {
                field: "event_type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Work,
    Other,
}

impl Location {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Work => "work",
            Location::Other => "other",
        }
    }
}

impl FromStr for Location {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Location::Home),
            "work" => Ok(Location::Work),
            "other" => Ok(Location::Other),
            other => Err(UnknownValue {
                field: "location",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value outside the enumerated set for a closed field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {field} value: {value}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

/// Stored bodily event, as listed from the database.
///
/// `event_type` and `location` stay raw text here: the table predates the
/// closed enums and may hold values outside them. The aggregator excludes
/// such rows from every category instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub event_type: String,
    pub location: String,
    pub who: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Parse the stored type text into the closed enum, if it is in range.
    pub fn kind(&self) -> Option<EventType> {
        self.event_type.parse().ok()
    }
}

/// Stored toothbrushing event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToothbrushEvent {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub used_irrigator: bool,
}

/// Validated insert record for the events table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub location: Location,
    pub who: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Validated insert record for the toothbrush_events table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToothbrushEvent {
    pub timestamp: DateTime<Utc>,
    pub used_irrigator: bool,
}
