//! Event types broadcast by the coordinator
//!
//! These events announce the outcome of handled signals:
//! - Lifecycle (coordinator ready)
//! - Filter lifecycle (applied, reset)
//! - Refresh lifecycle (refresh complete)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FilterSet, ViewId};

/// Which position-preserving refresh primitive was issued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// Server-side data query re-issued
    Reload,
    /// Current rows re-rendered
    Redraw,
}

impl std::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reload => write!(f, "reload"),
            Self::Redraw => write!(f, "redraw"),
        }
    }
}

/// Outbound coordinator event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoordEvent {
    /// Startup binding is complete; views may now register
    CoordinatorReady,
    /// A panel's filters were captured and stored for a view
    FiltersApplied { view_id: ViewId, filters: FilterSet },
    /// A view's filters were cleared
    FiltersReset { view_id: ViewId },
    /// A refresh call was issued to a view's widget
    ///
    /// Means the call was made, not that new rows have arrived.
    RefreshComplete { view_id: ViewId, mode: RefreshMode },
}

impl CoordEvent {
    /// Get the view this event concerns, if any
    pub fn view_id(&self) -> Option<&ViewId> {
        match self {
            CoordEvent::CoordinatorReady => None,
            CoordEvent::FiltersApplied { view_id, .. }
            | CoordEvent::FiltersReset { view_id }
            | CoordEvent::RefreshComplete { view_id, .. } => Some(view_id),
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            CoordEvent::CoordinatorReady => "CoordinatorReady",
            CoordEvent::FiltersApplied { .. } => "FiltersApplied",
            CoordEvent::FiltersReset { .. } => "FiltersReset",
            CoordEvent::RefreshComplete { .. } => "RefreshComplete",
        }
    }
}

/// A timestamped event log entry for file persistence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Timestamp of the event
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// The event
    pub event: CoordEvent,
}

impl EventLogEntry {
    /// Create a new log entry with current timestamp
    pub fn new(event: CoordEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_view_id() {
        let event = CoordEvent::FiltersReset {
            view_id: ViewId::new("logs"),
        };
        assert_eq!(event.view_id(), Some(&ViewId::new("logs")));
        assert_eq!(CoordEvent::CoordinatorReady.view_id(), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = CoordEvent::FiltersApplied {
            view_id: ViewId::new("logs"),
            filters: [("status", "active")].into_iter().collect(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"FiltersApplied""#));
        assert!(json.contains(r#""view_id":"logs""#));
        assert!(json.contains(r#""status":"active""#));

        let parsed: CoordEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_refresh_mode_serialization() {
        let event = CoordEvent::RefreshComplete {
            view_id: ViewId::new("users"),
            mode: RefreshMode::Redraw,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""mode":"redraw""#));
    }

    #[test]
    fn test_event_log_entry_timestamp() {
        let before = Utc::now();
        let entry = EventLogEntry::new(CoordEvent::CoordinatorReady);
        let after = Utc::now();

        assert!(entry.timestamp >= before);
        assert!(entry.timestamp <= after);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"ts\""));
        assert!(json.contains("CoordinatorReady"));
    }
}
