//! Coordinator - routes UI and cross-component signals to filter and refresh operations
//!
//! ```text
//!   apply / reset / key ──▶ resolve panel ──▶ FilterStore ──▶ FiltersApplied / FiltersReset
//!                                                  │
//!   item created / updated / deleted ──────────────┴──▶ refresh(view) ──▶ RefreshComplete
//!   refresh requested                                      │
//!                                                    Registry ──▶ widget reload / redraw
//! ```

mod core;
mod handle;
mod messages;

pub use self::core::Coordinator;
pub use handle::{DEFAULT_INBOX_CAPACITY, SignalSender, signal_channel};
pub use messages::{Outcome, Signal, SkipReason};
