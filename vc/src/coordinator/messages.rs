//! Coordinator messages
//!
//! Inbound signals and the outcome of handling each one.

use serde::{Deserialize, Serialize};

use crate::domain::ViewId;
use crate::events::RefreshMode;

/// Inbound signal handled by the coordinator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    // === UI actions on a filter panel ===
    /// The panel's apply control was clicked
    ApplyClicked { panel: String },
    /// The panel's reset control was clicked
    ResetClicked { panel: String },
    /// A key was pressed inside one of the panel's inputs
    KeyPressed { panel: String, key: String },
    /// The user changed a control's visible value
    InputChanged { panel: String, field: String, value: String },

    // === Cross-component notifications ===
    ItemCreated { view_id: ViewId },
    ItemUpdated { view_id: ViewId },
    ItemDeleted { view_id: ViewId },
    RefreshRequested { view_id: ViewId },
}

impl Signal {
    /// Get the signal name
    pub fn kind(&self) -> &'static str {
        match self {
            Signal::ApplyClicked { .. } => "ApplyClicked",
            Signal::ResetClicked { .. } => "ResetClicked",
            Signal::KeyPressed { .. } => "KeyPressed",
            Signal::InputChanged { .. } => "InputChanged",
            Signal::ItemCreated { .. } => "ItemCreated",
            Signal::ItemUpdated { .. } => "ItemUpdated",
            Signal::ItemDeleted { .. } => "ItemDeleted",
            Signal::RefreshRequested { .. } => "RefreshRequested",
        }
    }

    /// Panel this signal originates from, for UI actions
    pub fn panel(&self) -> Option<&str> {
        match self {
            Signal::ApplyClicked { panel }
            | Signal::ResetClicked { panel }
            | Signal::KeyPressed { panel, .. }
            | Signal::InputChanged { panel, .. } => Some(panel),
            _ => None,
        }
    }
}

/// Why a signal ended in a no-op
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// No panel with this id is mounted
    UnknownPanel(String),
    /// The panel has no view marker
    MissingViewMarker(String),
    /// No live widget is registered for the view
    NotRegistered(ViewId),
    /// A key other than the apply key
    IgnoredKey(String),
    /// The panel has no value-bearing control with this name
    UnknownField { panel: String, field: String },
}

impl SkipReason {
    /// Configuration defects are caller mistakes, the rest are expected
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::UnknownPanel(_) | Self::MissingViewMarker(_) | Self::UnknownField { .. }
        )
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPanel(panel) => write!(f, "no panel mounted with id '{}'", panel),
            Self::MissingViewMarker(panel) => write!(f, "panel '{}' has no view marker", panel),
            Self::NotRegistered(view_id) => write!(f, "view '{}' has no registered widget", view_id),
            Self::IgnoredKey(key) => write!(f, "key '{}' does not apply filters", key),
            Self::UnknownField { panel, field } => write!(f, "panel '{}' has no control '{}'", panel, field),
        }
    }
}

/// Result of handling one signal
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// Filters captured and stored; `refreshed` is None if the view had no widget
    Applied {
        view_id: ViewId,
        refreshed: Option<RefreshMode>,
    },
    /// Filters cleared; `refreshed` is None if the view had no widget
    Reset {
        view_id: ViewId,
        refreshed: Option<RefreshMode>,
    },
    /// A refresh call was issued
    Refreshed { view_id: ViewId, mode: RefreshMode },
    /// A control's visible value changed
    Edited,
    /// Nothing happened
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Refresh mode issued while handling the signal, if any
    pub fn refresh_mode(&self) -> Option<RefreshMode> {
        match self {
            Self::Applied { refreshed, .. } | Self::Reset { refreshed, .. } => *refreshed,
            Self::Refreshed { mode, .. } => Some(*mode),
            Self::Edited | Self::Skipped(_) => None,
        }
    }
}
