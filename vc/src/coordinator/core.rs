//! Main Coordinator implementation

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::messages::{Outcome, Signal, SkipReason};
use crate::config::Config;
use crate::domain::{FilterSet, ViewId};
use crate::events::{CoordEvent, EventBus, RefreshMode};
use crate::filters::{FilterReader, FilterStore};
use crate::page::{FilterPanel, Page};
use crate::registry::{DataWidget, Registry};

/// The View Coordinator: one per page session
///
/// Owns the registry, the filter store and the mounted filter panels, and
/// routes inbound signals to filter and refresh operations. Each signal is
/// handled to completion before the next one; nothing is queued between
/// signals.
pub struct Coordinator {
    config: Config,
    registry: Registry,
    filters: FilterStore,
    page: Page,
    bus: EventBus,
    ready: bool,
}

impl Coordinator {
    /// Create a new Coordinator with the given configuration
    pub fn new(config: Config) -> Self {
        debug!(debug = config.debug, apply_key = %config.apply_key, "Coordinator::new");
        let bus = EventBus::new(config.channel_capacity);
        Self {
            config,
            registry: Registry::new(),
            filters: FilterStore::new(),
            page: Page::new(),
            bus,
            ready: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Finish startup binding and announce readiness
    ///
    /// Broadcasts `CoordinatorReady` once; later calls do nothing.
    pub fn start(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        info!(panels = self.page.len(), "Coordinator ready");
        self.bus.emit(CoordEvent::CoordinatorReady);
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Subscribe to outbound events
    pub fn subscribe(&self) -> broadcast::Receiver<CoordEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // === Registry ===

    /// Register the widget that renders a view; the last registration wins
    pub fn register(&mut self, view_id: impl Into<ViewId>, widget: &Arc<dyn DataWidget>) {
        let view_id = view_id.into();
        if !self.ready {
            debug!(%view_id, "Coordinator::register: registering before ready");
        }
        self.registry.register(view_id, widget);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // === Page ===

    /// Mount a filter panel
    pub fn mount_panel(&mut self, panel: FilterPanel) {
        if panel.view.is_none() {
            self.diagnostic(&SkipReason::MissingViewMarker(panel.id.clone()));
        }
        self.page.mount(panel);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    // === Filter queries ===

    /// Current filters for a view, or the empty set
    pub fn get_filters(&self, view_id: &ViewId) -> FilterSet {
        self.filters.get(view_id)
    }

    /// Read handle for widget fetch logic
    pub fn filter_reader(&self) -> FilterReader {
        self.filters.reader()
    }

    // === Signal routing ===

    /// Handle one inbound signal to completion
    pub fn handle(&mut self, signal: Signal) -> Outcome {
        debug!(signal = signal.kind(), panel = ?signal.panel(), "Coordinator::handle");
        match signal {
            Signal::ApplyClicked { panel } => self.apply_filters(&panel),
            Signal::KeyPressed { panel, key } => {
                if key == self.config.apply_key {
                    self.apply_filters(&panel)
                } else {
                    debug!(%key, "Coordinator::handle: not the apply key");
                    Outcome::Skipped(SkipReason::IgnoredKey(key))
                }
            }
            Signal::ResetClicked { panel } => self.reset_filters(&panel),
            Signal::InputChanged { panel, field, value } => self.edit_value(&panel, &field, value),
            Signal::ItemCreated { view_id }
            | Signal::ItemUpdated { view_id }
            | Signal::ItemDeleted { view_id }
            | Signal::RefreshRequested { view_id } => self.refresh(&view_id),
        }
    }

    /// Drain a signal inbox until every sender is dropped
    ///
    /// Announces readiness first. Returns the number of signals handled.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<Signal>) -> usize {
        self.start();
        let mut handled = 0;
        while let Some(signal) = rx.recv().await {
            let outcome = self.handle(signal);
            debug!(?outcome, "Coordinator::run: signal handled");
            handled += 1;
        }
        info!(handled, "Coordinator::run: signal inbox closed");
        handled
    }

    /// Refresh a view's widget, keeping its pagination
    ///
    /// A view with no live widget is a no-op: filters may be applied before
    /// the widget finishes registering.
    pub fn refresh(&self, view_id: &ViewId) -> Outcome {
        let Some(widget) = self.registry.resolve(view_id) else {
            debug!(%view_id, "Coordinator::refresh: no widget registered, nothing to refresh");
            return Outcome::Skipped(SkipReason::NotRegistered(view_id.clone()));
        };

        let mode = if widget.supports_reload() {
            widget.reload_keeping_position();
            RefreshMode::Reload
        } else {
            widget.redraw_keeping_position();
            RefreshMode::Redraw
        };

        debug!(%view_id, %mode, "Coordinator::refresh: refresh issued");
        self.bus.emitter_for(view_id).refresh_complete(mode);
        Outcome::Refreshed {
            view_id: view_id.clone(),
            mode,
        }
    }

    fn apply_filters(&mut self, panel_id: &str) -> Outcome {
        let (filters, view_id) = match self.resolve_panel(panel_id) {
            Ok((panel, view_id)) => (self.filters.capture(panel), view_id),
            Err(reason) => return self.skip(reason),
        };

        self.filters.apply(&view_id, filters.clone());
        self.bus.emitter_for(&view_id).filters_applied(filters);

        let refreshed = self.refresh(&view_id).refresh_mode();
        Outcome::Applied { view_id, refreshed }
    }

    fn reset_filters(&mut self, panel_id: &str) -> Outcome {
        let view_id = match self.resolve_panel(panel_id) {
            Ok((_, view_id)) => view_id,
            Err(reason) => return self.skip(reason),
        };

        if let Some(panel) = self.page.panel_mut(panel_id) {
            self.filters.reset(&view_id, panel);
        }
        self.bus.emitter_for(&view_id).filters_reset();

        let refreshed = self.refresh(&view_id).refresh_mode();
        Outcome::Reset { view_id, refreshed }
    }

    fn edit_value(&mut self, panel_id: &str, field: &str, value: String) -> Outcome {
        if self.page.panel(panel_id).is_none() {
            return self.skip(SkipReason::UnknownPanel(panel_id.to_string()));
        }
        if self.page.set_value(panel_id, field, value) {
            Outcome::Edited
        } else {
            self.skip(SkipReason::UnknownField {
                panel: panel_id.to_string(),
                field: field.to_string(),
            })
        }
    }

    /// Resolve a panel and the view its marker names
    fn resolve_panel(&self, panel_id: &str) -> Result<(&FilterPanel, ViewId), SkipReason> {
        let panel = self
            .page
            .panel(panel_id)
            .ok_or_else(|| SkipReason::UnknownPanel(panel_id.to_string()))?;
        let view_id = self
            .page
            .view_for(panel_id)
            .cloned()
            .ok_or_else(|| SkipReason::MissingViewMarker(panel_id.to_string()))?;
        Ok((panel, view_id))
    }

    fn skip(&self, reason: SkipReason) -> Outcome {
        self.diagnostic(&reason);
        Outcome::Skipped(reason)
    }

    /// Report a configuration defect when debug diagnostics are enabled
    fn diagnostic(&self, reason: &SkipReason) {
        if self.config.debug && reason.is_configuration_defect() {
            warn!(%reason, "Coordinator: configuration defect, signal ignored");
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("ready", &self.ready)
            .field("registry", &self.registry)
            .field("filters", &self.filters)
            .field("panels", &self.page.len())
            .finish()
    }
}
