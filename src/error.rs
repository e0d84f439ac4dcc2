//! Error types for routing calls and planning requests.

/// Failure of a single routing call. Recovered per candidate.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("HTTP error calling directions service: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directions service returned {code}: {message}")]
    Status { code: String, message: String },
    #[error("directions service found no route")]
    NoRoute,
    #[error("invalid route metrics: {0}")]
    InvalidMetrics(String),
    #[error("routing provider unavailable: {0}")]
    Unavailable(String),
}

/// Request-level failure. Aborts the plan.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("could not find location: {0}")]
    LocationNotFound(String),
    #[error("mandatory preference not found: {0}")]
    MandatoryPreferenceUnsatisfied(String),
    #[error("routing provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("location lookup failed for task {task_id}: {reason}")]
    LocationLookup { task_id: String, reason: String },
    #[error("request cancelled")]
    Cancelled,
}

impl PlannerError {
    /// Failure reason string for the calling layer.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
