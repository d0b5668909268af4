// Ports to the page environment: controls, network, chart surface, window, storage
use crate::domain::error::Result;
use crate::domain::params::ControlValue;
use crate::domain::payload::{ChartPayload, RenderOptions};
use crate::domain::ui_state::{Notification, Theme};
use async_trait::async_trait;
use bytes::Bytes;

/// Live form controls on the page
pub trait ControlSource: Send + Sync {
    /// Current value, or `None` if the control is not on the page
    fn read(&self, control_id: &str) -> Option<ControlValue>;

    /// Programmatic assignment; returns false if the control is absent
    /// or rejects the value
    fn assign(&self, control_id: &str, value: ControlValue) -> bool;

    fn contains(&self, control_id: &str) -> bool {
        self.read(control_id).is_some()
    }
}

#[async_trait]
pub trait ChartClient: Send + Sync {
    /// GET `target` (endpoint path plus query string) and return the raw body.
    /// Transport errors and non-success statuses are `FetchFailure`.
    async fn get(&self, target: &str) -> Result<Bytes>;
}

/// Charting library bound to mount points
pub trait ChartSurface: Send + Sync {
    fn draw(&self, mount_id: &str, payload: &ChartPayload, options: RenderOptions);

    /// Replace the mount content with a text notice
    fn show_notice(&self, mount_id: &str, message: &str);

    fn relayout(&self, mount_id: &str);

    fn holds_chart(&self, mount_id: &str) -> bool;
}

/// Window-level facilities
pub trait HostEnvironment: Send + Sync {
    /// Toggle the tab button and its content panel
    fn set_tab_active(&self, view_id: &str, active: bool);

    fn apply_theme(&self, theme: Theme);

    fn print(&self);

    fn table_rows(&self, table_id: &str) -> Option<Vec<Vec<String>>>;

    fn download(&self, filename: &str, content_type: &str, content: &[u8]);

    fn show_notification(&self, notification: &Notification);

    fn dismiss_notification(&self, id: u64);
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
