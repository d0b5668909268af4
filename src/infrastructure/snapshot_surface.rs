// Chart surface that writes each mount point to a JSON snapshot file
use crate::application::ports::ChartSurface;
use crate::domain::payload::{ChartPayload, RenderOptions};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Snapshot<'a> {
    Chart {
        mount_id: &'a str,
        rendered_at: String,
        config: RenderOptions,
        data: &'a Value,
        layout: &'a Value,
    },
    Notice {
        mount_id: &'a str,
        rendered_at: String,
        message: &'a str,
    },
}

pub struct SnapshotSurface {
    dir: PathBuf,
    /// Mount id -> number of layout passes since it was drawn
    charts: Mutex<HashMap<String, u32>>,
}

impl SnapshotSurface {
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            charts: Mutex::new(HashMap::new()),
        })
    }

    pub fn snapshot_path(&self, mount_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", mount_id))
    }

    pub fn relayout_count(&self, mount_id: &str) -> u32 {
        self.charts
            .lock()
            .map(|c| c.get(mount_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn write(&self, mount_id: &str, snapshot: &Snapshot<'_>) -> bool {
        let path = self.snapshot_path(mount_id);
        let result = serde_json::to_vec_pretty(snapshot)
            .map_err(std::io::Error::other)
            .and_then(|bytes| std::fs::write(&path, bytes));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error writing snapshot {}: {}", path.display(), e);
                false
            }
        }
    }
}

impl ChartSurface for SnapshotSurface {
    fn draw(&self, mount_id: &str, payload: &ChartPayload, options: RenderOptions) {
        let snapshot = Snapshot::Chart {
            mount_id,
            rendered_at: Utc::now().to_rfc3339(),
            config: options,
            data: &payload.data,
            layout: &payload.layout,
        };
        if self.write(mount_id, &snapshot) {
            if let Ok(mut charts) = self.charts.lock() {
                charts.insert(mount_id.to_string(), 0);
            }
            tracing::info!("Rendered {}", mount_id);
        }
    }

    fn show_notice(&self, mount_id: &str, message: &str) {
        if let Ok(mut charts) = self.charts.lock() {
            charts.remove(mount_id);
        }
        let snapshot = Snapshot::Notice {
            mount_id,
            rendered_at: Utc::now().to_rfc3339(),
            message,
        };
        self.write(mount_id, &snapshot);
    }

    fn relayout(&self, mount_id: &str) {
        if let Ok(mut charts) = self.charts.lock() {
            if let Some(passes) = charts.get_mut(mount_id) {
                *passes += 1;
                tracing::debug!("Relayout {} (pass {})", mount_id, passes);
            }
        }
    }

    fn holds_chart(&self, mount_id: &str) -> bool {
        self.charts
            .lock()
            .map(|c| c.contains_key(mount_id))
            .unwrap_or(false)
    }
}
