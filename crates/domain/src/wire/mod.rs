//! Wire schema layer
//!
//! These structs mirror the JSON shapes the planning service sends and
//! accepts. Timestamps and durations stay as strings here; the domain layer
//! in [`crate::types`] owns parsing them.

pub mod model;
pub mod plan;
pub mod resource;
pub mod simulation;

pub use model::{ApiMetadataSchema, ApiMissionModel, ApiMissionModelInsert};
pub use plan::{
    ApiActivityBody, ApiActivityDraft, ApiActivityInsert, ApiActivityPlanCreate,
    ApiActivityPlanRead, ApiActivityRead, ApiPlanCreatePayload, ApiPlanPatch, ApiSimulationRef,
};
pub use resource::{ApiProfile, ApiProfileSegment, ApiResourceType};
pub use simulation::{
    ApiDatasetProfiles, ApiSimulateResponse, ApiSimulatedActivity, ApiSimulationArguments,
    ApiSimulationDataset, ApiSimulationInsert, ApiSimulationPlanRef, ApiSimulationResults,
};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) const fn default_true() -> bool {
    true
}
