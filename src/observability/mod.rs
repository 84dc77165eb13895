//! Observability for collguard
//!
//! Structured JSON log lines on stderr plus a typed event catalogue.
//!
//! # Usage
//!
//! ```ignore
//! use collguard::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CollectionCreated, &[("namespace", "Test.FILT_RECORDS")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{render, Logger, Severity};

/// Log a lifecycle event with fields at the event's severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
