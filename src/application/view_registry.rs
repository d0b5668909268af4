// View registry - Static lookup from tab name to its chart slots
use crate::application::ports::ControlSource;
use crate::domain::view::{ChartSlot, View};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    views: Vec<View>,
}

impl ViewRegistry {
    pub fn new(views: Vec<View>) -> Self {
        Self { views }
    }

    /// Slots of a view in declaration order; empty for an unknown view
    pub fn slots_for(&self, view_id: &str) -> &[ChartSlot] {
        self.views
            .iter()
            .find(|v| v.id == view_id)
            .map(|v| v.slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, view_id: &str) -> bool {
        self.views.iter().any(|v| v.id == view_id)
    }

    pub fn slots(&self) -> impl Iterator<Item = &ChartSlot> {
        self.views.iter().flat_map(|v| v.slots.iter())
    }

    pub fn slot(&self, mount_id: &str) -> Option<&ChartSlot> {
        self.slots().find(|s| s.mount_id == mount_id)
    }

    pub fn mount_ids(&self) -> Vec<String> {
        self.slots().map(|s| s.mount_id.clone()).collect()
    }

    /// Slots of every view whose bindings read `control_id`
    pub fn slots_bound_to(&self, control_id: &str) -> Vec<&ChartSlot> {
        self.slots().filter(|s| s.is_bound_to(control_id)).collect()
    }

    /// Mount ids whose required controls are all present on this page
    pub fn applicable(&self, controls: &dyn ControlSource) -> HashSet<String> {
        self.slots()
            .filter(|slot| {
                let missing: Vec<&str> = slot
                    .required_controls()
                    .filter(|c| !controls.contains(c))
                    .collect();
                if !missing.is_empty() {
                    tracing::debug!(
                        "Slot {} is not on this page - missing controls {:?}",
                        slot.mount_id,
                        missing
                    );
                }
                missing.is_empty()
            })
            .map(|s| s.mount_id.clone())
            .collect()
    }
}
