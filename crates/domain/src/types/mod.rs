//! Domain schema layer
//!
//! Client-side types with parsed timestamps, durations and schemas. Every
//! type converts from its wire counterpart in [`crate::wire`] and back.

pub mod activity;
pub mod model;
pub mod plan;
pub mod resource;
pub mod simulation;

pub use activity::Activity;
pub use model::{MetadataSchema, MetadataValueType, MissionModel, MissionModelUpload};
pub use plan::{ActivityPlanCreate, ActivityPlanRead, PlanPatch};
pub use resource::{
    resource_matches, timelines_from_profiles, ResourceSample, ResourceTimelines, ResourceType,
    SchemaKind, ValueSchema, VariantOption,
};
pub use simulation::{
    failure_reason, SimulatedActivity, SimulationDataset, SimulationResults, SimulationStatus,
    SimulationStatusReport,
};

pub type PlanId = i64;
pub type ActivityId = i64;
pub type ModelId = i64;
pub type SimulationId = i64;
pub type DatasetId = i64;
/// Id the file gateway assigns to an uploaded artifact.
pub type FileId = i64;
