//! Domain module
//!
//! Core domain types for tracked events.

pub mod events;

pub use events::{
    Event, EventType, Location, NewEvent, NewToothbrushEvent, ToothbrushEvent, UnknownValue,
};
