// Theme preference persistence
use crate::application::ports::KeyValueStore;
use crate::domain::error::Result;
use crate::domain::ui_state::Theme;
use std::sync::Arc;

pub const THEME_KEY: &str = "theme";

#[derive(Clone)]
pub struct ThemePreferences {
    store: Arc<dyn KeyValueStore>,
}

impl ThemePreferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved theme, falling back to light
    pub fn load(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring saved theme: {}", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("Could not read theme preference: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}
