// Host environment for a terminal session
use crate::application::ports::HostEnvironment;
use crate::domain::ui_state::{Notification, NotificationKind, Theme};
use crate::infrastructure::config::TableConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct TerminalHost {
    tables: HashMap<String, Vec<Vec<String>>>,
    download_dir: PathBuf,
    active: Mutex<Option<String>>,
}

impl TerminalHost {
    pub fn new(tables: &[TableConfig], download_dir: PathBuf) -> Self {
        Self {
            tables: tables
                .iter()
                .map(|t| (t.id.clone(), t.rows.clone()))
                .collect(),
            download_dir,
            active: Mutex::new(None),
        }
    }

    pub fn active_tab(&self) -> Option<String> {
        self.active.lock().ok().and_then(|a| a.clone())
    }
}

impl HostEnvironment for TerminalHost {
    fn set_tab_active(&self, view_id: &str, active: bool) {
        if let Ok(mut current) = self.active.lock() {
            if active {
                *current = Some(view_id.to_string());
            } else if current.as_deref() == Some(view_id) {
                *current = None;
            }
        }
        tracing::info!("Tab {} {}", view_id, if active { "active" } else { "inactive" });
    }

    fn apply_theme(&self, theme: Theme) {
        tracing::info!("Theme set to {}", theme);
    }

    fn print(&self) {
        let tab = self.active_tab().unwrap_or_else(|| "-".to_string());
        println!("[print] dashboard tab {} sent to printer", tab);
    }

    fn table_rows(&self, table_id: &str) -> Option<Vec<Vec<String>>> {
        self.tables.get(table_id).cloned()
    }

    fn download(&self, filename: &str, content_type: &str, content: &[u8]) {
        let path = self.download_dir.join(filename);
        match std::fs::write(&path, content) {
            Ok(()) => tracing::info!(
                "Saved {} ({} bytes, {})",
                path.display(),
                content.len(),
                content_type
            ),
            Err(e) => tracing::error!("Error saving {}: {}", path.display(), e),
        }
    }

    fn show_notification(&self, notification: &Notification) {
        let label = match notification.kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        };
        println!("[{}] {}", label, notification.message);
    }

    fn dismiss_notification(&self, id: u64) {
        tracing::debug!("Notification {} dismissed", id);
    }
}
