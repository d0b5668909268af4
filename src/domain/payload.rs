// Chart payload returned by the backend
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ data, layout }` pair, passed through to the chart surface untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub data: Value,
    pub layout: Value,
}

impl ChartPayload {
    pub fn new(data: Value, layout: Value) -> Self {
        Self { data, layout }
    }

    /// Decode a response body; both keys are required
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub responsive: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { responsive: true }
    }
}
