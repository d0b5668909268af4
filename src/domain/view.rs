// View and chart slot domain models

/// How a control's raw value is turned into a query parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTransform {
    #[default]
    Identity,
    /// Checkbox state rendered as "true"/"false"
    Boolean,
    /// Date input normalized to YYYY-MM-DD
    IsoDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlBinding {
    pub control_id: String,
    pub param: String,
    pub transform: ValueTransform,
    /// Optional bindings are omitted when the control is absent or empty
    pub optional: bool,
}

impl ControlBinding {
    pub fn new(control_id: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            param: param.into(),
            transform: ValueTransform::Identity,
            optional: false,
        }
    }

    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Two selectors that must never resolve to the same axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisConstraint {
    pub x_control: String,
    pub y_control: String,
    pub options: Vec<String>,
}

impl AxisConstraint {
    /// First enumerated option distinct from `x`
    pub fn replacement_for(&self, x: &str) -> Option<&str> {
        self.options.iter().map(String::as_str).find(|o| *o != x)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlot {
    pub mount_id: String,
    pub endpoint: String,
    pub bindings: Vec<ControlBinding>,
    pub defaults: Vec<(String, String)>,
    pub axes: Option<AxisConstraint>,
}

impl ChartSlot {
    pub fn new(mount_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            mount_id: mount_id.into(),
            endpoint: endpoint.into(),
            bindings: Vec::new(),
            defaults: Vec::new(),
            axes: None,
        }
    }

    pub fn bind(mut self, binding: ControlBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn with_default(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.push((param.into(), value.into()));
        self
    }

    pub fn with_axes(mut self, axes: AxisConstraint) -> Self {
        self.axes = Some(axes);
        self
    }

    pub fn is_bound_to(&self, control_id: &str) -> bool {
        self.bindings.iter().any(|b| b.control_id == control_id)
    }

    /// Controls that must be on the page for this slot to apply
    pub fn required_controls(&self) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .filter(|b| !b.optional)
            .map(|b| b.control_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id: String,
    pub slots: Vec<ChartSlot>,
}

impl View {
    pub fn new(id: impl Into<String>, slots: Vec<ChartSlot>) -> Self {
        Self {
            id: id.into(),
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_skips_current_axis() {
        let axes = AxisConstraint {
            x_control: "scatter-x".to_string(),
            y_control: "scatter-y".to_string(),
            options: vec!["unemployment_rate".into(), "cases".into(), "gdp_growth".into()],
        };

        assert_eq!(axes.replacement_for("unemployment_rate"), Some("cases"));
        assert_eq!(axes.replacement_for("cases"), Some("unemployment_rate"));
    }

    #[test]
    fn test_required_controls_skip_optional_bindings() {
        let slot = ChartSlot::new("economy-timeseries", "/api/economy/timeseries")
            .bind(ControlBinding::new("economy-metric", "metric"))
            .bind(ControlBinding::new("economy-start", "start_date").optional());

        let required: Vec<&str> = slot.required_controls().collect();
        assert_eq!(required, vec!["economy-metric"]);
        assert!(slot.is_bound_to("economy-start"));
        assert!(!slot.is_bound_to("covid-metric"));
    }
}
