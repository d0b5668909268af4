// In-memory page controls seeded from configuration
use crate::application::ports::ControlSource;
use crate::domain::params::ControlValue;
use crate::infrastructure::config::{ControlConfig, ControlKind};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct Control {
    kind: ControlKind,
    value: ControlValue,
    options: Vec<String>,
}

impl Control {
    fn accepts(&self, value: &ControlValue) -> bool {
        match (self.kind, value) {
            (ControlKind::Checkbox, ControlValue::Checked(_)) => true,
            (ControlKind::Checkbox, ControlValue::Text(_)) => false,
            (_, ControlValue::Checked(_)) => false,
            (_, ControlValue::Text(v)) => self.options.is_empty() || self.options.contains(v),
        }
    }
}

pub struct MemoryControls {
    controls: Mutex<HashMap<String, Control>>,
}

impl MemoryControls {
    pub fn from_config(configs: &[ControlConfig]) -> Self {
        let controls = configs
            .iter()
            .map(|c| {
                let value = match c.kind {
                    ControlKind::Checkbox => ControlValue::Checked(c.value == "true"),
                    _ => ControlValue::Text(c.value.clone()),
                };
                let control = Control {
                    kind: c.kind,
                    value,
                    options: c.options.clone(),
                };
                (c.id.clone(), control)
            })
            .collect();

        Self {
            controls: Mutex::new(controls),
        }
    }

    pub fn kind(&self, control_id: &str) -> Option<ControlKind> {
        self.controls
            .lock()
            .ok()
            .and_then(|c| c.get(control_id).map(|c| c.kind))
    }
}

impl ControlSource for MemoryControls {
    fn read(&self, control_id: &str) -> Option<ControlValue> {
        self.controls
            .lock()
            .ok()
            .and_then(|c| c.get(control_id).map(|c| c.value.clone()))
    }

    fn assign(&self, control_id: &str, value: ControlValue) -> bool {
        let Ok(mut controls) = self.controls.lock() else {
            return false;
        };
        match controls.get_mut(control_id) {
            Some(control) if control.accepts(&value) => {
                control.value = value;
                true
            }
            Some(_) => {
                tracing::warn!("Control {} rejected value {:?}", control_id, value);
                false
            }
            None => false,
        }
    }
}
