// UI state controller - Tab switching, control changes and window side effects
use crate::application::debounce::{Debouncer, RESIZE_DEBOUNCE};
use crate::application::dispatcher::{ChartOutcome, ChartRequestDispatcher, RequestTracker};
use crate::application::notifier::{NOTIFICATION_TTL, Notifier};
use crate::application::param_resolver::{ParamResolver, Resolution};
use crate::application::ports::{ChartClient, ChartSurface, ControlSource, HostEnvironment, KeyValueStore};
use crate::application::preferences::ThemePreferences;
use crate::application::renderer::{ChartRenderer, Locale};
use crate::application::table_export::{CSV_CONTENT_TYPE, DEFAULT_EXPORT_FILENAME, rows_to_csv};
use crate::application::view_registry::ViewRegistry;
use crate::domain::error::DashboardError;
use crate::domain::params::QueryParams;
use crate::domain::ui_state::{NotificationKind, UiState};
use crate::domain::view::ChartSlot;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Bound on chained axis reassignments triggered by one interaction
const MAX_REPLAYS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SelectTab(String),
    ControlChanged(String),
    Resized,
    ToggleTheme,
    Print,
    ExportTable {
        table_id: String,
        filename: Option<String>,
    },
    Shutdown,
}

enum Signal {
    Outcome(ChartOutcome),
    ResizeSettled,
}

/// Page collaborators the controller talks to
pub struct ControllerPorts {
    pub controls: Arc<dyn ControlSource>,
    pub client: Arc<dyn ChartClient>,
    pub surface: Arc<dyn ChartSurface>,
    pub host: Arc<dyn HostEnvironment>,
    pub store: Arc<dyn KeyValueStore>,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub locale: Locale,
    pub resize_debounce: Duration,
    pub notification_ttl: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            resize_debounce: RESIZE_DEBOUNCE,
            notification_ttl: NOTIFICATION_TTL,
        }
    }
}

pub struct UiStateController {
    registry: Arc<ViewRegistry>,
    resolver: ParamResolver,
    dispatcher: ChartRequestDispatcher,
    renderer: ChartRenderer,
    host: Arc<dyn HostEnvironment>,
    preferences: ThemePreferences,
    notifier: Notifier,
    state: UiState,
    applicable: HashSet<String>,
    tracker: RequestTracker,
    resize: Debouncer,
    signals_tx: mpsc::UnboundedSender<Signal>,
    signals_rx: mpsc::UnboundedReceiver<Signal>,
}

impl UiStateController {
    pub fn new(registry: Arc<ViewRegistry>, ports: ControllerPorts, settings: ControllerSettings) -> Self {
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();

        let resize_tx = signals_tx.clone();
        let resize = Debouncer::new(settings.resize_debounce, move || {
            let _ = resize_tx.send(Signal::ResizeSettled);
        });

        let applicable = registry.applicable(ports.controls.as_ref());
        let preferences = ThemePreferences::new(ports.store);
        let state = UiState::new(preferences.load());
        ports.host.apply_theme(state.theme);

        Self {
            registry,
            resolver: ParamResolver::new(ports.controls),
            dispatcher: ChartRequestDispatcher::new(ports.client),
            renderer: ChartRenderer::new(ports.surface, settings.locale),
            notifier: Notifier::new(ports.host.clone(), settings.notification_ttl),
            host: ports.host,
            preferences,
            state,
            applicable,
            tracker: RequestTracker::new(),
            resize,
            signals_tx,
            signals_rx,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn in_flight(&self, mount_id: &str) -> bool {
        self.tracker.in_flight(mount_id)
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SelectTab(view_id) => self.select_tab(&view_id),
            UiEvent::ControlChanged(control_id) => self.control_changed(&control_id),
            UiEvent::Resized => self.window_resized(),
            UiEvent::ToggleTheme => self.toggle_theme(),
            UiEvent::Print => self.print(),
            UiEvent::ExportTable { table_id, filename } => {
                self.export_table(&table_id, filename.as_deref())
            }
            UiEvent::Shutdown => self.detach(),
        }
    }

    /// Activate a view and load its charts. Re-selecting the active view does nothing.
    pub fn select_tab(&mut self, view_id: &str) {
        if self.state.is_active(view_id) {
            tracing::debug!("View {} is already active", view_id);
            return;
        }
        if !self.registry.contains(view_id) {
            tracing::debug!("{}", DashboardError::UnknownView(view_id.to_string()));
            return;
        }

        if let Some(previous) = self.state.active_view.take() {
            self.host.set_tab_active(&previous, false);
        }
        self.host.set_tab_active(view_id, true);
        self.state.active_view = Some(view_id.to_string());

        let mounts = self
            .registry
            .slots_for(view_id)
            .iter()
            .map(|s| s.mount_id.clone())
            .collect();
        self.load_slots(mounts);
    }

    /// Reload only the slots that read `control_id`
    pub fn control_changed(&mut self, control_id: &str) {
        let mounts = self.bound_mounts(control_id);
        if mounts.is_empty() {
            tracing::debug!("No chart reads control {}", control_id);
            return;
        }
        self.load_slots(mounts);
    }

    pub fn window_resized(&mut self) {
        self.resize.call();
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
        self.host.apply_theme(self.state.theme);
        if let Err(e) = self.preferences.save(self.state.theme) {
            tracing::warn!("Could not persist theme: {}", e);
        }
    }

    pub fn print(&self) {
        self.host.print();
    }

    pub fn export_table(&mut self, table_id: &str, filename: Option<&str>) {
        let Some(rows) = self.host.table_rows(table_id) else {
            tracing::debug!("No table {} on this page", table_id);
            return;
        };
        let filename = filename.unwrap_or(DEFAULT_EXPORT_FILENAME);
        let locale = self.renderer.locale();

        match rows_to_csv(&rows) {
            Ok(csv) => {
                self.host.download(filename, CSV_CONTENT_TYPE, &csv);
                self.notifier
                    .notify(locale.export_done(filename), NotificationKind::Success);
            }
            Err(e) => {
                tracing::error!("Error exporting table {}: {}", table_id, e);
                self.notifier
                    .notify(locale.export_failed(), NotificationKind::Error);
            }
        }
    }

    /// Apply a finished request if it is still the slot's newest one
    pub fn handle_outcome(&mut self, outcome: ChartOutcome) {
        let ChartOutcome {
            mount_id,
            generation,
            result,
        } = outcome;

        if !self.tracker.complete(&mount_id, generation) {
            tracing::debug!(
                "Discarding stale response {} for {}",
                generation,
                mount_id
            );
            return;
        }

        match result {
            Ok(payload) => self.renderer.render(&mount_id, &payload),
            Err(e) => {
                tracing::error!("Error loading chart {}: {}", mount_id, e);
                self.renderer.render_load_failure(&mount_id);
            }
        }
    }

    /// Process chart outcomes until no request is outstanding
    pub async fn settle(&mut self) {
        loop {
            while let Ok(signal) = self.signals_rx.try_recv() {
                self.handle_signal(signal);
            }
            if self.tracker.running() == 0 {
                return;
            }
            match self.signals_rx.recv().await {
                Some(signal) => self.handle_signal(signal),
                None => return,
            }
        }
    }

    /// Wait for the next internal signal (chart outcome or settled resize)
    pub async fn next_signal(&mut self) {
        if let Some(signal) = self.signals_rx.recv().await {
            self.handle_signal(signal);
        }
    }

    /// Drive the controller until `Shutdown` or the event stream ends
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(UiEvent::Shutdown) | None => break,
                    Some(event) => self.handle_event(event),
                },
                Some(signal) = self.signals_rx.recv() => self.handle_signal(signal),
            }
        }
        self.detach();
    }

    /// Stop timers and drop in-flight requests
    pub fn detach(&mut self) {
        self.resize.cancel();
        self.tracker.abort_all();
        tracing::debug!("Controller detached");
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Outcome(outcome) => self.handle_outcome(outcome),
            Signal::ResizeSettled => self.relayout(),
        }
    }

    fn relayout(&self) {
        let mounts = self.registry.mount_ids();
        let count = self.renderer.resize_all(mounts.iter().map(String::as_str));
        tracing::debug!("Relaid out {} charts", count);
    }

    fn bound_mounts(&self, control_id: &str) -> Vec<String> {
        self.registry
            .slots_bound_to(control_id)
            .into_iter()
            .map(|s| s.mount_id.clone())
            .collect()
    }

    /// Resolve and dispatch each slot; deferred reassignments replay as control changes
    fn load_slots(&mut self, mounts: Vec<String>) {
        let mut replays = VecDeque::new();
        for mount_id in &mounts {
            if let Some(control_id) = self.load_slot(mount_id) {
                replays.push_back(control_id);
            }
        }

        let mut replayed = 0;
        while let Some(control_id) = replays.pop_front() {
            replayed += 1;
            if replayed > MAX_REPLAYS {
                tracing::warn!("Giving up on control {} after {} reassignments", control_id, MAX_REPLAYS);
                break;
            }
            for mount_id in self.bound_mounts(&control_id) {
                if let Some(next) = self.load_slot(&mount_id) {
                    replays.push_back(next);
                }
            }
        }
    }

    fn load_slot(&mut self, mount_id: &str) -> Option<String> {
        if !self.applicable.contains(mount_id) {
            tracing::debug!("Skipping {} - not on this page", mount_id);
            return None;
        }
        let slot = self.registry.slot(mount_id)?.clone();

        match self.resolver.resolve(&slot) {
            Ok(Resolution::Ready(params)) => {
                self.issue(slot, params);
                None
            }
            Ok(Resolution::Deferred { control_id }) => Some(control_id),
            Err(e) if e.is_skip() => {
                tracing::debug!("Skipping {}: {}", mount_id, e);
                None
            }
            Err(e) => {
                tracing::warn!("Not loading {}: {}", mount_id, e);
                None
            }
        }
    }

    fn issue(&mut self, slot: ChartSlot, params: QueryParams) {
        let generation = self.tracker.begin(&slot.mount_id);
        let mount_id = slot.mount_id.clone();
        let dispatcher = self.dispatcher.clone();
        let tx = self.signals_tx.clone();

        let task = tokio::spawn(async move {
            let result = dispatcher.dispatch(&slot, &params).await;
            let _ = tx.send(Signal::Outcome(ChartOutcome {
                mount_id: slot.mount_id,
                generation,
                result,
            }));
        });
        self.tracker.attach(&mount_id, task);
    }
}
