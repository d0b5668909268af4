// Chart request dispatcher - One network call per chart slot
use crate::application::ports::ChartClient;
use crate::domain::error::{DashboardError, Result};
use crate::domain::params::QueryParams;
use crate::domain::payload::ChartPayload;
use crate::domain::view::ChartSlot;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Result of one slot request, tagged with the generation it was issued under
#[derive(Debug)]
pub struct ChartOutcome {
    pub mount_id: String,
    pub generation: u64,
    pub result: Result<ChartPayload>,
}

/// `endpoint?query`, or the bare endpoint when there are no parameters
pub fn build_target(endpoint: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}?{}", endpoint, params.to_query_string())
    }
}

#[derive(Clone)]
pub struct ChartRequestDispatcher {
    client: Arc<dyn ChartClient>,
}

impl ChartRequestDispatcher {
    pub fn new(client: Arc<dyn ChartClient>) -> Self {
        Self { client }
    }

    /// Single attempt, no retries and no caching
    pub async fn dispatch(&self, slot: &ChartSlot, params: &QueryParams) -> Result<ChartPayload> {
        let target = build_target(&slot.endpoint, params);
        tracing::debug!("Requesting chart {} from {}", slot.mount_id, target);

        let body = self.client.get(&target).await?;
        ChartPayload::from_slice(&body).map_err(|e| DashboardError::parse(&target, e))
    }
}

#[derive(Default)]
struct SlotRequest {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Per-slot generation counter; only the newest request of a slot may render
#[derive(Default)]
pub struct RequestTracker {
    slots: HashMap<String, SlotRequest>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `mount_id`, superseding any in-flight one
    pub fn begin(&mut self, mount_id: &str) -> u64 {
        let entry = self.slots.entry(mount_id.to_string()).or_default();
        if let Some(task) = entry.task.take() {
            tracing::debug!(
                "Superseding in-flight request {} for {}",
                entry.generation,
                mount_id
            );
            task.abort();
        }
        entry.generation += 1;
        entry.generation
    }

    pub fn attach(&mut self, mount_id: &str, task: JoinHandle<()>) {
        if let Some(entry) = self.slots.get_mut(mount_id) {
            entry.task = Some(task);
        }
    }

    /// True if `generation` is the slot's newest request; clears it as in flight
    pub fn complete(&mut self, mount_id: &str, generation: u64) -> bool {
        match self.slots.get_mut(mount_id) {
            Some(entry) if entry.generation == generation => {
                entry.task = None;
                true
            }
            _ => false,
        }
    }

    pub fn in_flight(&self, mount_id: &str) -> bool {
        self.slots
            .get(mount_id)
            .is_some_and(|e| e.task.is_some())
    }

    /// Requests whose task has not finished yet
    pub fn running(&self) -> usize {
        self.slots
            .values()
            .filter(|e| e.task.as_ref().is_some_and(|t| !t.is_finished()))
            .count()
    }

    pub fn abort_all(&mut self) {
        for entry in self.slots.values_mut() {
            if let Some(task) = entry.task.take() {
                task.abort();
            }
        }
    }
}
