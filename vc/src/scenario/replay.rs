//! Scenario replay
//!
//! Builds a coordinator from a scenario, stands in simulated widgets for the
//! rendering library, and feeds each step through the coordinator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::model::{Scenario, Step, ViewSpec, WidgetKind};
use crate::config::Config;
use crate::coordinator::{Coordinator, Outcome, Signal};
use crate::domain::{FilterSet, ViewId};
use crate::events::CoordEvent;
use crate::filters::FilterReader;
use crate::registry::DataWidget;

/// Stand-in widget that records refresh calls and the filters it pulled
pub struct SimulatedWidget {
    view_id: ViewId,
    kind: WidgetKind,
    reader: FilterReader,
    reloads: AtomicUsize,
    redraws: AtomicUsize,
    pulled: Mutex<Vec<FilterSet>>,
}

impl SimulatedWidget {
    pub fn new(view_id: ViewId, kind: WidgetKind, reader: FilterReader) -> Self {
        Self {
            view_id,
            kind,
            reader,
            reloads: AtomicUsize::new(0),
            redraws: AtomicUsize::new(0),
            pulled: Mutex::new(Vec::new()),
        }
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn redraws(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    /// Filters read at each reload, oldest first
    pub fn pulled(&self) -> Vec<FilterSet> {
        match self.pulled.lock() {
            Ok(pulled) => pulled.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn report(&self) -> WidgetReport {
        WidgetReport {
            view_id: self.view_id.clone(),
            kind: self.kind,
            reloads: self.reloads(),
            redraws: self.redraws(),
            last_query: self.pulled().pop(),
        }
    }
}

impl DataWidget for SimulatedWidget {
    fn supports_reload(&self) -> bool {
        self.kind == WidgetKind::Server
    }

    fn reload_keeping_position(&self) {
        let filters = self.reader.get(&self.view_id);
        debug!(view_id = %self.view_id, %filters, "SimulatedWidget: reload");
        self.reloads.fetch_add(1, Ordering::SeqCst);
        match self.pulled.lock() {
            Ok(mut pulled) => pulled.push(filters),
            Err(poisoned) => poisoned.into_inner().push(filters),
        }
    }

    fn redraw_keeping_position(&self) {
        debug!(view_id = %self.view_id, "SimulatedWidget: redraw");
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }
}

/// Refresh statistics for one simulated widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetReport {
    pub view_id: ViewId,
    pub kind: WidgetKind,
    pub reloads: usize,
    pub redraws: usize,
    /// Filters pulled by the most recent reload
    pub last_query: Option<FilterSet>,
}

/// Result of one handled step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub description: String,
    /// None for register/destroy steps
    pub outcome: Option<Outcome>,
    pub events: Vec<CoordEvent>,
}

/// Everything observed while replaying a scenario
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Events emitted during startup
    pub startup: Vec<CoordEvent>,
    pub steps: Vec<StepReport>,
    pub widgets: Vec<WidgetReport>,
    /// Final stored filters per view
    pub filters: Vec<(ViewId, FilterSet)>,
}

impl ReplayReport {
    /// All events in emission order
    pub fn events(&self) -> impl Iterator<Item = &CoordEvent> {
        self.startup.iter().chain(self.steps.iter().flat_map(|s| s.events.iter()))
    }

    pub fn widget(&self, view_id: &ViewId) -> Option<&WidgetReport> {
        self.widgets.iter().find(|w| &w.view_id == view_id)
    }
}

/// A coordinator wired to a scenario's panels and simulated widgets
pub struct Replay {
    coordinator: Coordinator,
    rx: broadcast::Receiver<CoordEvent>,
    specs: Vec<ViewSpec>,
    /// Live widgets; the replay owns them the way a rendering library would
    widgets: HashMap<ViewId, Arc<SimulatedWidget>>,
    /// Reports of widgets destroyed or replaced during the run
    retired: Vec<WidgetReport>,
    steps: Vec<Step>,
}

impl Replay {
    pub fn new(scenario: Scenario, config: Config) -> Self {
        let mut coordinator = Coordinator::new(config);
        let rx = coordinator.subscribe();

        for panel in scenario.panels {
            coordinator.mount_panel(panel);
        }

        Self {
            coordinator,
            rx,
            specs: scenario.views,
            widgets: HashMap::new(),
            retired: Vec::new(),
            steps: scenario.steps,
        }
    }

    /// The coordinator being driven, e.g. to attach a journal before running
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Start the coordinator, register initial widgets and play every step
    pub fn run(mut self) -> ReplayReport {
        let mut report = ReplayReport::default();

        self.coordinator.start();
        let initial: Vec<ViewId> = self.specs.iter().filter(|s| s.register).map(|s| s.id.clone()).collect();
        for view_id in &initial {
            self.register(view_id);
        }
        report.startup = self.drain();

        let steps = std::mem::take(&mut self.steps);
        for (index, step) in steps.into_iter().enumerate() {
            let step_no = index + 1;
            let (description, outcome) = match step {
                Step::Register { register } => {
                    self.register(&register);
                    (format!("register {}", register), None)
                }
                Step::Destroy { destroy } => {
                    self.destroy(&destroy);
                    (format!("destroy {}", destroy), None)
                }
                Step::Signal(signal) => {
                    let description = describe(&signal);
                    (description, Some(self.coordinator.handle(signal)))
                }
            };
            debug!(step = step_no, %description, ?outcome, "Replay::run");
            report.steps.push(StepReport {
                step: step_no,
                description,
                outcome,
                events: self.drain(),
            });
        }

        let mut live: Vec<WidgetReport> = self.widgets.values().map(|w| w.report()).collect();
        live.sort_by(|a, b| a.view_id.cmp(&b.view_id));
        report.widgets = std::mem::take(&mut self.retired);
        report.widgets.extend(live);
        let mut views: Vec<&ViewId> = self.specs.iter().map(|s| &s.id).collect();
        views.sort();
        views.dedup();
        report.filters = views
            .into_iter()
            .map(|v| (v.clone(), self.coordinator.get_filters(v)))
            .collect();

        info!(steps = report.steps.len(), "Replay finished");
        report
    }

    fn register(&mut self, view_id: &ViewId) {
        let kind = self
            .specs
            .iter()
            .find(|s| &s.id == view_id)
            .map(|s| s.kind)
            .unwrap_or_default();
        let widget = Arc::new(SimulatedWidget::new(
            view_id.clone(),
            kind,
            self.coordinator.filter_reader(),
        ));
        let handle: Arc<dyn DataWidget> = widget.clone();
        self.coordinator.register(view_id.clone(), &handle);
        if let Some(previous) = self.widgets.insert(view_id.clone(), widget) {
            self.retired.push(previous.report());
        }
    }

    fn destroy(&mut self, view_id: &ViewId) {
        match self.widgets.remove(view_id) {
            Some(widget) => self.retired.push(widget.report()),
            None => warn!(%view_id, "Replay: destroy for a view with no live widget"),
        }
    }

    fn drain(&mut self) -> Vec<CoordEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(n)) => {
                    warn!(missed = n, "Replay: lagged behind, missed events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }
}

fn describe(signal: &Signal) -> String {
    match signal {
        Signal::ApplyClicked { panel } => format!("apply clicked on {}", panel),
        Signal::ResetClicked { panel } => format!("reset clicked on {}", panel),
        Signal::KeyPressed { panel, key } => format!("{} pressed in {}", key, panel),
        Signal::InputChanged { panel, field, value } => format!("{}.{} = {:?}", panel, field, value),
        Signal::ItemCreated { view_id } => format!("item created in {}", view_id),
        Signal::ItemUpdated { view_id } => format!("item updated in {}", view_id),
        Signal::ItemDeleted { view_id } => format!("item deleted in {}", view_id),
        Signal::RefreshRequested { view_id } => format!("refresh requested for {}", view_id),
    }
}
