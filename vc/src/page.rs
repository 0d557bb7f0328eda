//! Page structure model
//!
//! Filter panels are the structural model of a filter-controls container.
//! Each panel carries an explicit `view` attribute naming the view it
//! filters, so resolving a panel to its view is a plain lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ViewId;

/// Kind of a filter control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    #[default]
    Text,
    Select,
    Date,
    Hidden,
    /// Apply/reset buttons; they carry no value
    Button,
}

impl ControlKind {
    /// Whether controls of this kind hold a filter value
    pub fn is_value_bearing(&self) -> bool {
        !matches!(self, Self::Button)
    }
}

/// A single control inside a filter panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterControl {
    /// Field name the value filters on
    pub name: String,

    #[serde(default)]
    pub kind: ControlKind,

    /// Current visible value
    #[serde(default)]
    pub value: String,
}

impl FilterControl {
    pub fn new(name: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: String::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Text)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Select)
    }

    /// Builder-style initial value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// A filter-controls container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPanel {
    /// Panel identifier, unique per page
    pub id: String,

    /// The view this panel filters; None is a page configuration defect
    #[serde(default)]
    pub view: Option<ViewId>,

    /// Controls in display order
    #[serde(default)]
    pub controls: Vec<FilterControl>,
}

impl FilterPanel {
    /// Create an empty panel bound to a view
    pub fn new(id: impl Into<String>, view: impl Into<ViewId>) -> Self {
        Self {
            id: id.into(),
            view: Some(view.into()),
            controls: Vec::new(),
        }
    }

    /// Create a panel with no view marker
    pub fn unbound(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            view: None,
            controls: Vec::new(),
        }
    }

    /// Builder-style control append
    pub fn with_control(mut self, control: FilterControl) -> Self {
        self.controls.push(control);
        self
    }

    /// Value-bearing controls in display order
    pub fn value_controls(&self) -> impl Iterator<Item = &FilterControl> {
        self.controls.iter().filter(|c| c.kind.is_value_bearing())
    }

    /// Set the visible value of the first control with this name
    ///
    /// Returns false if no value-bearing control has that name.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self
            .controls
            .iter_mut()
            .find(|c| c.kind.is_value_bearing() && c.name == field)
        {
            Some(control) => {
                control.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Clear the visible value of every value-bearing control
    pub fn clear_values(&mut self) {
        for control in self.controls.iter_mut().filter(|c| c.kind.is_value_bearing()) {
            control.value.clear();
        }
    }
}

/// All filter panels mounted on the page
#[derive(Debug, Default)]
pub struct Page {
    panels: HashMap<String, FilterPanel>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a panel, replacing any panel with the same id
    pub fn mount(&mut self, panel: FilterPanel) {
        debug!(panel_id = %panel.id, view = ?panel.view, "Page::mount");
        self.panels.insert(panel.id.clone(), panel);
    }

    pub fn panel(&self, panel_id: &str) -> Option<&FilterPanel> {
        self.panels.get(panel_id)
    }

    pub fn panel_mut(&mut self, panel_id: &str) -> Option<&mut FilterPanel> {
        self.panels.get_mut(panel_id)
    }

    /// Resolve the view a panel is associated with
    pub fn view_for(&self, panel_id: &str) -> Option<&ViewId> {
        self.panels.get(panel_id).and_then(|p| p.view.as_ref())
    }

    /// Update a control's visible value, as the user typing or selecting would
    pub fn set_value(&mut self, panel_id: &str, field: &str, value: impl Into<String>) -> bool {
        match self.panels.get_mut(panel_id) {
            Some(panel) => panel.set_value(field, value),
            None => false,
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &FilterPanel> {
        self.panels.values()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
