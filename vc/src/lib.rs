//! viewcoord - filter and refresh coordination for tabular views
//!
//! Links filter panels to independently-owned data widgets. The coordinator
//! keeps every widget's rows consistent with the latest applied filters and
//! with external "data changed" notifications, without knowing how a widget
//! fetches or renders its rows.
//!
//! # Core Concepts
//!
//! - **Registry**: view id -> weak handle to the widget rendering it
//! - **Filter Store**: view id -> last-applied filter set, replaced wholesale
//! - **Event Router**: turns inbound signals into filter and refresh operations
//! - **Broadcasts**: outcomes announced on a fire-and-forget event bus
//!
//! # Modules
//!
//! - [`coordinator`] - the per-page coordinator and its signal inbox
//! - [`registry`] - widget handles and the registry
//! - [`filters`] - filter capture, storage and the widget-side reader
//! - [`page`] - filter panel structure
//! - [`events`] - outbound events, bus and journal
//! - [`auto_refresh`] - external refresh timer
//! - [`scenario`] - scripted sessions for the `vc` binary and tests
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod auto_refresh;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod events;
pub mod filters;
pub mod page;
pub mod registry;
pub mod scenario;

// Re-export commonly used types
pub use config::{AutoRefreshConfig, Config};
pub use coordinator::{Coordinator, Outcome, Signal, SignalSender, SkipReason, signal_channel};
pub use domain::{FilterSet, ViewId};
pub use events::{CoordEvent, EventBus, EventJournal, EventLogEntry, RefreshMode, read_journal, spawn_event_journal};
pub use filters::{FilterReader, FilterStore, capture};
pub use page::{ControlKind, FilterControl, FilterPanel, Page};
pub use registry::{DataWidget, Registry};
pub use scenario::{Replay, ReplayReport, Scenario, ScenarioError};
