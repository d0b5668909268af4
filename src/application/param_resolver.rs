// Parameter resolver - Reads bound controls into query parameters
use crate::application::ports::ControlSource;
use crate::domain::error::{DashboardError, Result};
use crate::domain::params::{ControlValue, QueryParams};
use crate::domain::view::{AxisConstraint, ChartSlot, ControlBinding, ValueTransform};
use chrono::NaiveDate;
use std::sync::Arc;

const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ready(QueryParams),
    /// A control was reassigned; resolution continues with its change event
    Deferred { control_id: String },
}

#[derive(Clone)]
pub struct ParamResolver {
    controls: Arc<dyn ControlSource>,
}

impl ParamResolver {
    pub fn new(controls: Arc<dyn ControlSource>) -> Self {
        Self { controls }
    }

    pub fn resolve(&self, slot: &ChartSlot) -> Result<Resolution> {
        if let Some(axes) = &slot.axes {
            if let Some(control_id) = self.separate_axes(axes)? {
                return Ok(Resolution::Deferred { control_id });
            }
        }

        let mut params: QueryParams = slot.defaults.iter().cloned().collect();
        for binding in &slot.bindings {
            let Some(value) = self.controls.read(&binding.control_id) else {
                if binding.optional {
                    continue;
                }
                return Err(DashboardError::MissingControl(binding.control_id.clone()));
            };

            if let Some(v) = transform(binding, &value)? {
                params.insert(binding.param.as_str(), v);
            }
        }

        Ok(Resolution::Ready(params))
    }

    /// Moves Y off X's value. Returns the reassigned control, if any.
    fn separate_axes(&self, axes: &AxisConstraint) -> Result<Option<String>> {
        let x = self.read_text(&axes.x_control)?;
        let y = self.read_text(&axes.y_control)?;
        if x != y {
            return Ok(None);
        }

        let replacement = axes
            .replacement_for(&x)
            .ok_or_else(|| DashboardError::InvalidControlValue {
                control_id: axes.y_control.clone(),
                value: y.clone(),
            })?;

        tracing::debug!(
            "Axis {} equals {} ({}), reassigning to {}",
            axes.y_control,
            axes.x_control,
            x,
            replacement
        );

        if !self
            .controls
            .assign(&axes.y_control, ControlValue::Text(replacement.to_string()))
        {
            return Err(DashboardError::InvalidControlValue {
                control_id: axes.y_control.clone(),
                value: replacement.to_string(),
            });
        }

        Ok(Some(axes.y_control.clone()))
    }

    fn read_text(&self, control_id: &str) -> Result<String> {
        self.controls
            .read(control_id)
            .map(|v| v.as_param())
            .ok_or_else(|| DashboardError::MissingControl(control_id.to_string()))
    }
}

/// `None` means the parameter is left out
fn transform(binding: &ControlBinding, value: &ControlValue) -> Result<Option<String>> {
    let raw = value.as_param();
    if raw.is_empty() && binding.optional {
        return Ok(None);
    }

    let invalid = || DashboardError::InvalidControlValue {
        control_id: binding.control_id.clone(),
        value: raw.clone(),
    };

    match binding.transform {
        ValueTransform::Identity => Ok(Some(raw.clone())),
        ValueTransform::Boolean => match value {
            ControlValue::Checked(b) => Ok(Some(b.to_string())),
            ControlValue::Text(s) => match s.as_str() {
                "true" | "on" => Ok(Some("true".to_string())),
                "false" | "off" | "" => Ok(Some("false".to_string())),
                _ => Err(invalid()),
            },
        },
        ValueTransform::IsoDate => DATE_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&raw, fmt).ok())
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(invalid),
    }
}
