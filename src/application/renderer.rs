// Chart renderer - Draws payloads or inline failure notices into mount points
use crate::application::ports::ChartSurface;
use crate::domain::payload::{ChartPayload, RenderOptions};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl Locale {
    pub fn chart_load_failed(&self) -> &'static str {
        match self {
            Locale::Vi => "Không thể tải biểu đồ. Vui lòng thử lại sau.",
            Locale::En => "Unable to load chart. Please try again later.",
        }
    }

    pub fn export_done(&self, filename: &str) -> String {
        match self {
            Locale::Vi => format!("Đã xuất dữ liệu ra {}", filename),
            Locale::En => format!("Exported data to {}", filename),
        }
    }

    pub fn export_failed(&self) -> &'static str {
        match self {
            Locale::Vi => "Xuất dữ liệu thất bại",
            Locale::En => "Export failed",
        }
    }
}

#[derive(Clone)]
pub struct ChartRenderer {
    surface: Arc<dyn ChartSurface>,
    locale: Locale,
    options: RenderOptions,
}

impl ChartRenderer {
    pub fn new(surface: Arc<dyn ChartSurface>, locale: Locale) -> Self {
        Self {
            surface,
            locale,
            options: RenderOptions::default(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn render(&self, mount_id: &str, payload: &ChartPayload) {
        self.surface.draw(mount_id, payload, self.options);
    }

    pub fn render_error(&self, mount_id: &str, message: &str) {
        self.surface.show_notice(mount_id, message);
    }

    pub fn render_load_failure(&self, mount_id: &str) {
        self.render_error(mount_id, self.locale.chart_load_failed());
    }

    /// No-op unless the mount holds a rendered chart
    pub fn resize(&self, mount_id: &str) -> bool {
        if !self.surface.holds_chart(mount_id) {
            return false;
        }
        self.surface.relayout(mount_id);
        true
    }

    /// Returns how many charts were relaid out
    pub fn resize_all<'a>(&self, mount_ids: impl IntoIterator<Item = &'a str>) -> usize {
        mount_ids.into_iter().filter(|id| self.resize(id)).count()
    }
}
