//! Outbound broadcast channels
//!
//! The coordinator announces the outcome of every handled signal on a
//! one-way broadcast bus. Emitting never waits on subscribers.
//!
//! ```text
//!   Coordinator ──emit──▶ EventBus (tokio::sync::broadcast)
//!                              │
//!           ┌──────────────────┼──────────────────┐
//!           ▼                  ▼                  ▼
//!     page widgets       EventJournal        test harness
//!                         (.jsonl)
//! ```
//!
//! See [`CoordEvent`] for the vocabulary:
//! - Lifecycle: `CoordinatorReady`
//! - Filters: `FiltersApplied`, `FiltersReset`
//! - Refresh: `RefreshComplete`

mod bus;
mod logger;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, ViewEmitter};
pub use logger::{EventJournal, read_journal, spawn_event_journal};
pub use types::{CoordEvent, EventLogEntry, RefreshMode};
