//! Simulation datasets and their lifecycle

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{DatasetId, PlanId, ResourceTimelines};
use crate::errors::{PlanError, Result};
use crate::impl_domain_status_conversions;
use crate::utils::duration::{parse_offset, serde_offset, serde_offset_opt, Offset};
use crate::utils::timestamp::{parse_timestamp, serde_timestamp_opt, Timestamp};
use crate::wire::{ApiSimulateResponse, ApiSimulatedActivity, ApiSimulationDataset, ApiSimulationResults};

use super::resource::timelines_from_profiles;

/// Lifecycle of a simulation dataset.
///
/// `Queued -> InProgress -> {Complete, Failed}`; a fast run may skip
/// `InProgress`. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationStatus {
    Queued,
    InProgress,
    Complete,
    Failed,
}

impl_domain_status_conversions!(SimulationStatus {
    Queued => "queued" | "pending",
    InProgress => "in-progress" | "incomplete" | "running",
    Complete => "complete" | "success",
    Failed => "failed",
});

impl SimulationStatus {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for unrecognised status strings.
    pub fn parse(text: &str) -> Result<Self> {
        text.parse().map_err(PlanError::SchemaValidation)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether a dataset may be observed moving from `self` to `next`.
    /// Re-observing the same state is always allowed.
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Queued, _) => true,
            (Self::InProgress, next) => !matches!(next, Self::Queued),
            (Self::Complete, Self::Complete) | (Self::Failed, Self::Failed) => true,
            (Self::Complete | Self::Failed, _) => false,
        }
    }
}

impl Serialize for SimulationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SimulationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Human-readable failure reason from a wire `reason` field.
///
/// The host sends either a plain string or an object carrying a `message`;
/// anything else is reported as compact JSON.
pub fn failure_reason(reason: Option<&Value>) -> Option<String> {
    match reason? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(Value::Object(fields.clone()).to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Status returned when a simulation is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatusReport {
    pub dataset_id: DatasetId,
    pub status: SimulationStatus,
    pub reason: Option<String>,
}

impl SimulationStatusReport {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for unrecognised statuses.
    pub fn from_wire(wire: &ApiSimulateResponse) -> Result<Self> {
        Ok(Self {
            dataset_id: wire.simulation_dataset_id,
            status: SimulationStatus::parse(&wire.status)?,
            reason: failure_reason(wire.reason.as_ref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationDataset {
    pub id: DatasetId,
    pub plan_id: PlanId,
    pub status: SimulationStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, with = "serde_timestamp_opt")]
    pub start_time: Option<Timestamp>,
    #[serde(default, with = "serde_timestamp_opt")]
    pub end_time: Option<Timestamp>,
}

impl SimulationDataset {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for unrecognised statuses or
    /// malformed bounds.
    pub fn from_wire(wire: &ApiSimulationDataset) -> Result<Self> {
        Ok(Self {
            id: wire.id,
            plan_id: wire.simulation.plan_id,
            status: SimulationStatus::parse(&wire.status)?,
            reason: failure_reason(wire.reason.as_ref()),
            start_time: wire.simulation_start_time.as_deref().map(parse_timestamp).transpose()?,
            end_time: wire.simulation_end_time.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    /// Simulated span, when both bounds are reported.
    pub fn span(&self) -> Option<Offset> {
        Some(self.end_time? - self.start_time?)
    }
}

/// An activity instance produced by a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedActivity {
    pub id: i64,
    pub activity_type: String,
    #[serde(with = "serde_offset")]
    pub start_offset: Offset,
    #[serde(default, with = "serde_offset_opt")]
    pub duration: Option<Offset>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub attributes: Value,
}

impl SimulatedActivity {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for malformed offsets.
    pub fn from_wire(wire: &ApiSimulatedActivity) -> Result<Self> {
        Ok(Self {
            id: wire.id,
            activity_type: wire.activity_type_name.clone(),
            start_offset: parse_offset(&wire.start_offset)?,
            duration: wire.duration.as_deref().map(parse_offset).transpose()?,
            parent_id: wire.parent_id,
            attributes: wire.attributes.clone(),
        })
    }
}

/// Everything a completed simulation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub dataset: SimulationDataset,
    pub activities: Vec<SimulatedActivity>,
    pub resources: ResourceTimelines,
}

impl SimulationResults {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for malformed rows.
    pub fn from_wire(wire: &ApiSimulationResults) -> Result<Self> {
        let dataset = SimulationDataset::from_wire(&wire.dataset)?;
        let activities = wire
            .simulated_activities
            .iter()
            .map(SimulatedActivity::from_wire)
            .collect::<Result<_>>()?;
        let resources = timelines_from_profiles(&wire.profiles.profiles, &[], dataset.span())?;
        Ok(Self { dataset, activities, resources })
    }
}
