//! Scenario file model and validation

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::coordinator::Signal;
use crate::domain::ViewId;
use crate::page::FilterPanel;

/// How a simulated widget refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Fetches rows from a server; supports reload
    #[default]
    Server,
    /// Holds rows client-side; redraw only
    Client,
}

/// A view with a simulated widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub id: ViewId,

    #[serde(default)]
    pub kind: WidgetKind,

    /// Register the widget before the first step
    #[serde(default = "default_register")]
    pub register: bool,
}

fn default_register() -> bool {
    true
}

/// One scenario step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Register (or re-register) a view's widget
    Register { register: ViewId },
    /// Drop a view's widget, as when the rendering library destroys it
    Destroy { destroy: ViewId },
    /// Deliver a signal to the coordinator
    Signal(Signal),
}

/// A replayable page session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub panels: Vec<FilterPanel>,
    pub views: Vec<ViewSpec>,
    pub steps: Vec<Step>,
}

/// Configuration defects found in a scenario
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("Panel '{panel}' has no view marker")]
    PanelWithoutView { panel: String },

    #[error("Panel '{panel}' filters view '{view}' which never registers a widget")]
    PanelForUnknownView { panel: String, view: ViewId },

    #[error("Panel '{panel}' is defined more than once")]
    DuplicatePanel { panel: String },

    #[error("Step {step} names unknown panel '{panel}'")]
    UnknownPanel { step: usize, panel: String },

    #[error("Step {step} names view '{view}' which is not declared")]
    UnknownView { step: usize, view: ViewId },
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context(format!("Failed to read scenario {}", path.display()))?;
        let scenario: Self = serde_yaml::from_str(&content).context("Failed to parse scenario")?;
        debug!(
            panels = scenario.panels.len(),
            views = scenario.views.len(),
            steps = scenario.steps.len(),
            "Scenario::load"
        );
        Ok(scenario)
    }

    /// Find configuration defects; an empty list means the scenario is clean
    pub fn validate(&self) -> Vec<ScenarioError> {
        let mut errors = Vec::new();
        let views: HashSet<&ViewId> = self.views.iter().map(|v| &v.id).collect();
        let registered = self.registered_views();
        let mut panels = HashSet::new();

        for panel in &self.panels {
            if !panels.insert(panel.id.as_str()) {
                errors.push(ScenarioError::DuplicatePanel {
                    panel: panel.id.clone(),
                });
            }
            match &panel.view {
                None => errors.push(ScenarioError::PanelWithoutView {
                    panel: panel.id.clone(),
                }),
                Some(view) if !registered.contains(view) => errors.push(ScenarioError::PanelForUnknownView {
                    panel: panel.id.clone(),
                    view: view.clone(),
                }),
                Some(_) => {}
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let step_no = index + 1;
            let (panel, view) = match step {
                Step::Register { register: view } | Step::Destroy { destroy: view } => (None, Some(view)),
                Step::Signal(signal) => (signal.panel(), signal_view(signal)),
            };
            if let Some(panel) = panel
                && !panels.contains(panel)
            {
                errors.push(ScenarioError::UnknownPanel {
                    step: step_no,
                    panel: panel.to_string(),
                });
            }
            if let Some(view) = view
                && !views.contains(view)
            {
                errors.push(ScenarioError::UnknownView {
                    step: step_no,
                    view: view.clone(),
                });
            }
        }

        errors
    }

    /// Views that get a widget at some point: registered at startup or by a step
    fn registered_views(&self) -> HashSet<&ViewId> {
        let initial = self.views.iter().filter(|v| v.register).map(|v| &v.id);
        let stepped = self.steps.iter().filter_map(|step| match step {
            Step::Register { register } => Some(register),
            _ => None,
        });
        initial.chain(stepped).collect()
    }
}

fn signal_view(signal: &Signal) -> Option<&ViewId> {
    match signal {
        Signal::ItemCreated { view_id }
        | Signal::ItemUpdated { view_id }
        | Signal::ItemDeleted { view_id }
        | Signal::RefreshRequested { view_id } => Some(view_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
panels:
  - id: logs-filters
    view: logs
    controls:
      - name: status
        kind: select
        value: active
      - name: owner
views:
  - id: logs
    register: false
steps:
  - signal: apply_clicked
    panel: logs-filters
  - register: logs
  - signal: item_created
    view_id: logs
  - destroy: logs
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.panels.len(), 1);
        assert_eq!(scenario.views[0].kind, WidgetKind::Server);
        assert!(!scenario.views[0].register);
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(scenario.steps[0], Step::Signal(Signal::ApplyClicked { .. })));
        assert_eq!(
            scenario.steps[1],
            Step::Register {
                register: ViewId::new("logs")
            }
        );
        assert!(matches!(scenario.steps[3], Step::Destroy { .. }));
    }

    #[test]
    fn test_valid_scenario() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_defects() {
        let yaml = r#"
panels:
  - id: orphan
  - id: users-filters
    view: users
  - id: orphan
views:
  - id: logs
steps:
  - signal: apply_clicked
    panel: missing
  - signal: refresh_requested
    view_id: audit
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        let errors = scenario.validate();

        assert!(errors.contains(&ScenarioError::PanelWithoutView {
            panel: "orphan".to_string()
        }));
        assert!(errors.contains(&ScenarioError::DuplicatePanel {
            panel: "orphan".to_string()
        }));
        assert!(errors.contains(&ScenarioError::PanelForUnknownView {
            panel: "users-filters".to_string(),
            view: ViewId::new("users"),
        }));
        assert!(errors.contains(&ScenarioError::UnknownPanel {
            step: 1,
            panel: "missing".to_string()
        }));
        assert!(errors.contains(&ScenarioError::UnknownView {
            step: 2,
            view: ViewId::new("audit")
        }));
    }

    #[test]
    fn test_validate_panel_for_view_that_never_registers() {
        let yaml = r#"
panels:
  - id: logs-filters
    view: logs
views:
  - id: logs
    register: false
steps:
  - signal: apply_clicked
    panel: logs-filters
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            scenario.validate(),
            vec![ScenarioError::PanelForUnknownView {
                panel: "logs-filters".to_string(),
                view: ViewId::new("logs"),
            }]
        );
    }

    #[test]
    fn test_validate_late_registration_is_clean() {
        let yaml = r#"
panels:
  - id: logs-filters
    view: logs
views:
  - id: logs
    register: false
steps:
  - signal: apply_clicked
    panel: logs-filters
  - register: logs
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = ScenarioError::UnknownPanel {
            step: 3,
            panel: "p".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Step 3"));
        assert!(msg.contains("'p'"));
    }
}
