// Error kinds surfaced by the chart orchestration layer
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to fetch {target}: {cause}")]
    FetchFailure { target: String, cause: String },

    #[error("failed to parse payload from {target}: {cause}")]
    PayloadParseFailure { target: String, cause: String },

    #[error("control {0} is not on this page")]
    MissingControl(String),

    #[error("unknown view {0}")]
    UnknownView(String),

    #[error("control {control_id} has invalid value {value:?}")]
    InvalidControlValue { control_id: String, value: String },

    #[error("export error: {0}")]
    Export(String),

    #[error("preference store error: {0}")]
    Store(String),
}

impl DashboardError {
    pub fn fetch(target: &str, cause: impl ToString) -> Self {
        DashboardError::FetchFailure {
            target: target.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn parse(target: &str, cause: impl ToString) -> Self {
        DashboardError::PayloadParseFailure {
            target: target.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Errors that mean "not applicable here" rather than a failure
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingControl(_) | DashboardError::UnknownView(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
