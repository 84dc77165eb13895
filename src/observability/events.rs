//! Observable events emitted while enforcing or checking a schema

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Enforcement
    /// Enforcement run begins
    EnforceBegin,
    /// Mode, database and endpoint resolved
    ConfigResolved,
    /// Client construction begins
    ConnectBegin,
    /// Server answered ping
    Connected,
    /// Collection names listed
    CollectionsListed,
    /// Collection created with validator
    CollectionCreated,
    /// Existing collection's validator replaced
    ValidatorUpdated,
    /// Enforcement aborted (FATAL)
    EnforceFailed,

    // Inspection
    /// Collection options read back
    InspectComplete,

    // Local checks
    /// Document passed local validation
    DocumentAccepted,
    /// Document failed local validation
    DocumentRejected,
    /// Stored `doc_hash` differs from the recomputed fingerprint
    DocHashMismatch,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::EnforceBegin => "ENFORCE_BEGIN",
            Event::ConfigResolved => "CONFIG_RESOLVED",
            Event::ConnectBegin => "CONNECT_BEGIN",
            Event::Connected => "CONNECTED",
            Event::CollectionsListed => "COLLECTIONS_LISTED",
            Event::CollectionCreated => "COLLECTION_CREATED",
            Event::ValidatorUpdated => "VALIDATOR_UPDATED",
            Event::EnforceFailed => "ENFORCE_FAILED",
            Event::InspectComplete => "INSPECT_COMPLETE",
            Event::DocumentAccepted => "DOCUMENT_ACCEPTED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
            Event::DocHashMismatch => "DOC_HASH_MISMATCH",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::EnforceFailed)
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        if self.is_fatal() {
            return Severity::Fatal;
        }
        match self {
            Event::DocumentRejected | Event::DocHashMismatch => Severity::Warn,
            Event::ConfigResolved | Event::ConnectBegin => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::EnforceBegin,
            Event::ConfigResolved,
            Event::ConnectBegin,
            Event::Connected,
            Event::CollectionsListed,
            Event::CollectionCreated,
            Event::ValidatorUpdated,
            Event::EnforceFailed,
            Event::InspectComplete,
            Event::DocumentAccepted,
            Event::DocumentRejected,
            Event::DocHashMismatch,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::EnforceFailed.is_fatal());
        assert!(!Event::CollectionCreated.is_fatal());
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::EnforceFailed.severity(), Severity::Fatal);
        assert_eq!(Event::DocHashMismatch.severity(), Severity::Warn);
        assert_eq!(Event::ConfigResolved.severity(), Severity::Trace);
        assert_eq!(Event::CollectionCreated.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ValidatorUpdated), "VALIDATOR_UPDATED");
    }
}
