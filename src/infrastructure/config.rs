use crate::application::renderer::Locale;
use crate::application::view_registry::ViewRegistry;
use crate::domain::view::{AxisConstraint, ChartSlot, ControlBinding, ValueTransform, View};
use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub client: ClientSettings,
    #[serde(default)]
    pub controls: Vec<ControlConfig>,
    #[serde(default)]
    pub views: Vec<ViewConfig>,
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_initial_view")]
    pub initial_view: String,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    #[default]
    Select,
    Text,
    Date,
    Checkbox,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    pub id: String,
    #[serde(default)]
    pub kind: ControlKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    pub id: String,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlotConfig {
    pub mount: String,
    pub endpoint: String,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    pub axes: Option<AxisConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BindingConfig {
    pub control: String,
    pub param: String,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransformConfig {
    #[default]
    Identity,
    Boolean,
    IsoDate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AxisConfig {
    pub x: String,
    pub y: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    pub id: String,
    pub rows: Vec<Vec<String>>,
}

fn default_initial_view() -> String {
    "economy".to_string()
}

fn default_resize_debounce_ms() -> u64 {
    250
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("preferences.toml")
}

impl From<TransformConfig> for ValueTransform {
    fn from(t: TransformConfig) -> Self {
        match t {
            TransformConfig::Identity => ValueTransform::Identity,
            TransformConfig::Boolean => ValueTransform::Boolean,
            TransformConfig::IsoDate => ValueTransform::IsoDate,
        }
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    settings
        .try_deserialize()
        .context("Invalid dashboard configuration")
}

/// Replace `${name}` placeholders in a template
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

impl DashboardConfig {
    /// Build the registry, rejecting duplicate mounts and axis controls
    /// that the slot does not bind
    pub fn build_registry(&self) -> anyhow::Result<ViewRegistry> {
        let mut seen = HashSet::new();
        let mut views = Vec::with_capacity(self.views.len());

        for view in &self.views {
            let mut vars = HashMap::new();
            vars.insert("view".to_string(), view.id.clone());

            let mut slots = Vec::with_capacity(view.slots.len());
            for slot in &view.slots {
                if !seen.insert(slot.mount.clone()) {
                    anyhow::bail!("Mount {} is declared more than once", slot.mount);
                }
                slots.push(build_slot(slot, &vars)?);
            }
            views.push(View::new(view.id.clone(), slots));
        }

        Ok(ViewRegistry::new(views))
    }
}

fn build_slot(config: &SlotConfig, vars: &HashMap<String, String>) -> anyhow::Result<ChartSlot> {
    let mut slot = ChartSlot::new(config.mount.clone(), expand_template(&config.endpoint, vars));

    for binding in &config.bindings {
        let mut b = ControlBinding::new(binding.control.clone(), binding.param.clone())
            .with_transform(binding.transform.into());
        if binding.optional {
            b = b.optional();
        }
        slot = slot.bind(b);
    }

    for (param, value) in &config.defaults {
        slot = slot.with_default(param.clone(), value.clone());
    }

    if let Some(axes) = &config.axes {
        for control in [&axes.x, &axes.y] {
            if !slot.is_bound_to(control) {
                anyhow::bail!(
                    "Axis control {} of {} is not bound to a parameter",
                    control,
                    config.mount
                );
            }
        }
        slot = slot.with_axes(AxisConstraint {
            x_control: axes.x.clone(),
            y_control: axes.y.clone(),
            options: axes.options.clone(),
        });
    }

    Ok(slot)
}
