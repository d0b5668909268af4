// In-memory ports for exercising the controller without a page
use crate::application::ports::{ChartClient, ChartSurface, ControlSource, HostEnvironment, KeyValueStore};
use crate::application::view_registry::ViewRegistry;
use crate::domain::error::{DashboardError, Result};
use crate::domain::params::ControlValue;
use crate::domain::payload::{ChartPayload, RenderOptions};
use crate::domain::ui_state::{Notification, Theme};
use crate::domain::view::{AxisConstraint, ChartSlot, ControlBinding, ValueTransform, View};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const EMPTY_PAYLOAD: &str = r#"{"data":[],"layout":{}}"#;

pub fn text(value: &str) -> ControlValue {
    ControlValue::Text(value.to_string())
}

pub fn sample_registry() -> ViewRegistry {
    let economy = View::new(
        "economy",
        vec![
            ChartSlot::new("economy-timeseries", "/api/economy/timeseries")
                .bind(ControlBinding::new("economy-metric", "metric"))
                .bind(
                    ControlBinding::new("economy-start", "start_date")
                        .with_transform(ValueTransform::IsoDate)
                        .optional(),
                )
                .bind(
                    ControlBinding::new("economy-end", "end_date")
                        .with_transform(ValueTransform::IsoDate)
                        .optional(),
                ),
            ChartSlot::new("economy-distribution", "/api/economy/distribution")
                .bind(ControlBinding::new("distribution-metric", "metric"))
                .bind(ControlBinding::new("distribution-type", "type")),
            ChartSlot::new("economy-heatmap", "/api/economy/heatmap"),
            ChartSlot::new("economy-sunburst", "/api/economy/sunburst"),
            ChartSlot::new("economy-comparison", "/api/economy/comparison"),
        ],
    );
    let covid = View::new(
        "covid",
        vec![
            ChartSlot::new("covid-timeseries", "/api/covid/timeseries")
                .bind(ControlBinding::new("covid-metric", "metric"))
                .bind(ControlBinding::new("covid-show-ma", "show_ma").with_transform(ValueTransform::Boolean)),
            ChartSlot::new("covid-treemap", "/api/covid/treemap"),
        ],
    );
    let impact = View::new(
        "impact",
        vec![
            ChartSlot::new("economy-scatter", "/api/economy/scatter")
                .bind(ControlBinding::new("scatter-x", "x"))
                .bind(ControlBinding::new("scatter-y", "y"))
                .with_axes(AxisConstraint {
                    x_control: "scatter-x".to_string(),
                    y_control: "scatter-y".to_string(),
                    options: vec![
                        "unemployment_rate".to_string(),
                        "gdp_growth".to_string(),
                        "cases".to_string(),
                    ],
                }),
            ChartSlot::new("impact-analysis", "/api/impact/analysis"),
        ],
    );
    ViewRegistry::new(vec![economy, covid, impact])
}

pub struct FakeControls {
    values: Mutex<HashMap<String, ControlValue>>,
}

impl FakeControls {
    pub fn new(entries: Vec<(&str, ControlValue)>) -> Self {
        Self {
            values: Mutex::new(
                entries
                    .into_iter()
                    .map(|(id, v)| (id.to_string(), v))
                    .collect(),
            ),
        }
    }

    /// Controls present on the sample dashboard page, at their initial values
    pub fn sample() -> Self {
        Self::new(vec![
            ("economy-metric", text("unemployment_rate")),
            ("distribution-metric", text("unemployment_rate")),
            ("distribution-type", text("histogram")),
            ("covid-metric", text("cases")),
            ("covid-show-ma", ControlValue::Checked(true)),
            ("scatter-x", text("unemployment_rate")),
            ("scatter-y", text("cases")),
        ])
    }

    pub fn set(&self, control_id: &str, value: ControlValue) {
        self.values
            .lock()
            .unwrap()
            .insert(control_id.to_string(), value);
    }

    pub fn remove(&self, control_id: &str) {
        self.values.lock().unwrap().remove(control_id);
    }
}

impl ControlSource for FakeControls {
    fn read(&self, control_id: &str) -> Option<ControlValue> {
        self.values.lock().unwrap().get(control_id).cloned()
    }

    fn assign(&self, control_id: &str, value: ControlValue) -> bool {
        let mut values = self.values.lock().unwrap();
        match values.get_mut(control_id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[derive(Clone)]
pub enum FakeResponse {
    Body(String),
    Fail(String),
    Delayed(Duration, String),
}

/// Serves `EMPTY_PAYLOAD` for every target unless overridden
pub struct FakeChartClient {
    routes: Mutex<HashMap<String, FakeResponse>>,
    calls: Mutex<Vec<String>>,
}

impl FakeChartClient {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Override the response for an exact target or a bare endpoint path
    pub fn respond(&self, target: &str, response: FakeResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(target.to_string(), response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|t| t.split('?').next() == Some(path))
            .collect()
    }

    fn lookup(&self, target: &str) -> FakeResponse {
        let routes = self.routes.lock().unwrap();
        let path = target.split('?').next().unwrap_or(target);
        routes
            .get(target)
            .or_else(|| routes.get(path))
            .cloned()
            .unwrap_or_else(|| FakeResponse::Body(EMPTY_PAYLOAD.to_string()))
    }
}

#[async_trait]
impl ChartClient for FakeChartClient {
    async fn get(&self, target: &str) -> Result<Bytes> {
        self.calls.lock().unwrap().push(target.to_string());
        match self.lookup(target) {
            FakeResponse::Body(body) => Ok(Bytes::from(body)),
            FakeResponse::Fail(cause) => Err(DashboardError::fetch(target, cause)),
            FakeResponse::Delayed(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(Bytes::from(body))
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    charts: Mutex<HashMap<String, ChartPayload>>,
    notices: Mutex<HashMap<String, String>>,
    relayouts: Mutex<Vec<String>>,
    draws: AtomicUsize,
}

impl RecordingSurface {
    pub fn chart(&self, mount_id: &str) -> Option<ChartPayload> {
        self.charts.lock().unwrap().get(mount_id).cloned()
    }

    pub fn notice(&self, mount_id: &str) -> Option<String> {
        self.notices.lock().unwrap().get(mount_id).cloned()
    }

    pub fn relayouts(&self) -> Vec<String> {
        self.relayouts.lock().unwrap().clone()
    }

    pub fn draw_count(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }
}

impl ChartSurface for RecordingSurface {
    fn draw(&self, mount_id: &str, payload: &ChartPayload, options: RenderOptions) {
        assert!(options.responsive);
        self.draws.fetch_add(1, Ordering::SeqCst);
        self.notices.lock().unwrap().remove(mount_id);
        self.charts
            .lock()
            .unwrap()
            .insert(mount_id.to_string(), payload.clone());
    }

    fn show_notice(&self, mount_id: &str, message: &str) {
        self.charts.lock().unwrap().remove(mount_id);
        self.notices
            .lock()
            .unwrap()
            .insert(mount_id.to_string(), message.to_string());
    }

    fn relayout(&self, mount_id: &str) {
        self.relayouts.lock().unwrap().push(mount_id.to_string());
    }

    fn holds_chart(&self, mount_id: &str) -> bool {
        self.charts.lock().unwrap().contains_key(mount_id)
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub tables: HashMap<String, Vec<Vec<String>>>,
    tabs: Mutex<Vec<(String, bool)>>,
    themes: Mutex<Vec<Theme>>,
    prints: AtomicUsize,
    downloads: Mutex<Vec<(String, String, Vec<u8>)>>,
    notifications: Mutex<Vec<Notification>>,
    dismissed: Mutex<Vec<u64>>,
}

impl RecordingHost {
    pub fn with_table(mut self, table_id: &str, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(str::to_string).collect())
            .collect();
        self.tables.insert(table_id.to_string(), rows);
        self
    }

    pub fn tab_events(&self) -> Vec<(String, bool)> {
        self.tabs.lock().unwrap().clone()
    }

    pub fn themes(&self) -> Vec<Theme> {
        self.themes.lock().unwrap().clone()
    }

    pub fn print_count(&self) -> usize {
        self.prints.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> Vec<(String, String, Vec<u8>)> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn dismissed(&self) -> Vec<u64> {
        self.dismissed.lock().unwrap().clone()
    }
}

impl HostEnvironment for RecordingHost {
    fn set_tab_active(&self, view_id: &str, active: bool) {
        self.tabs
            .lock()
            .unwrap()
            .push((view_id.to_string(), active));
    }

    fn apply_theme(&self, theme: Theme) {
        self.themes.lock().unwrap().push(theme);
    }

    fn print(&self) {
        self.prints.fetch_add(1, Ordering::SeqCst);
    }

    fn table_rows(&self, table_id: &str) -> Option<Vec<Vec<String>>> {
        self.tables.get(table_id).cloned()
    }

    fn download(&self, filename: &str, content_type: &str, content: &[u8]) {
        self.downloads.lock().unwrap().push((
            filename.to_string(),
            content_type.to_string(),
            content.to_vec(),
        ));
    }

    fn show_notification(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }

    fn dismiss_notification(&self, id: u64) {
        self.dismissed.lock().unwrap().push(id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
