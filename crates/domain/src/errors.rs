//! Error types used throughout the client

use thiserror::Error;

/// Main error type for plansim operations
///
/// Every variant propagates unmodified to the CLI boundary. None of them are
/// retried by the client layer; transport retries belong to the host session.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Network or HTTP-level failure talking to the host.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials were rejected by the host.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The server understood the request and rejected it.
    #[error("API error: {0}")]
    Api(String),

    /// A request or response did not have the expected shape.
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    /// A simulation reached the terminal `failed` state.
    #[error("Simulation dataset {dataset_id} failed: {reason}")]
    SimulationFailed { dataset_id: i64, reason: String },

    /// The plan row exists on the server but a later step failed.
    ///
    /// Nothing is rolled back; callers use `plan_id` to clean up.
    #[error("Plan {plan_id} was created but plan creation did not finish: {source}")]
    PartialPlanCreation { plan_id: i64, source: Box<PlanError> },

    /// A bounded poll gave up before the simulation finished.
    #[error("Simulation dataset {dataset_id} still running after {polls} polls")]
    PollLimitExceeded { dataset_id: i64, polls: u32 },

    /// Settings that are missing or cannot be parsed, from any source.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlanError {
    /// Stable snake_case label for structured logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Auth(_) => "auth",
            Self::Api(_) => "api",
            Self::SchemaValidation(_) => "schema_validation",
            Self::SimulationFailed { .. } => "simulation_failed",
            Self::PartialPlanCreation { .. } => "partial_plan_creation",
            Self::PollLimitExceeded { .. } => "poll_limit_exceeded",
            Self::Config(_) => "config",
        }
    }

    /// Id of a plan left behind by a partially failed creation, if any.
    pub fn orphaned_plan_id(&self) -> Option<i64> {
        match self {
            Self::PartialPlanCreation { plan_id, .. } => Some(*plan_id),
            _ => None,
        }
    }

    /// Wrap `self` as the cause of a partial plan creation.
    ///
    /// Already-wrapped errors keep their original plan id.
    #[must_use]
    pub fn after_plan_created(self, plan_id: i64) -> Self {
        match self {
            Self::PartialPlanCreation { .. } => self,
            other => Self::PartialPlanCreation { plan_id, source: Box::new(other) },
        }
    }
}

/// Result type alias for plansim operations
pub type Result<T> = std::result::Result<T, PlanError>;
