//! Simulation request and dataset shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_default, ApiProfile};

/// `simulation_insert_input`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulationInsert {
    pub plan_id: i64,
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
    pub simulation_start_time: String,
    pub simulation_end_time: String,
}

/// Response of the `simulate` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulateResponse {
    pub status: String,
    #[serde(default)]
    pub reason: Option<Value>,
    #[serde(rename = "simulationDatasetId")]
    pub simulation_dataset_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSimulationPlanRef {
    pub plan_id: i64,
}

/// Row of `simulation_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulationDataset {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub reason: Option<Value>,
    pub simulation: ApiSimulationPlanRef,
    #[serde(default)]
    pub simulation_start_time: Option<String>,
    #[serde(default)]
    pub simulation_end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulatedActivity {
    pub id: i64,
    pub activity_type_name: String,
    pub start_offset: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub attributes: Value,
}

/// Profiles hang off the underlying `dataset` row, not the simulation dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDatasetProfiles {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: Vec<ApiProfile>,
}

/// A dataset row together with everything it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulationResults {
    #[serde(flatten)]
    pub dataset: ApiSimulationDataset,
    #[serde(default, deserialize_with = "null_as_default")]
    pub simulated_activities: Vec<ApiSimulatedActivity>,
    #[serde(default, rename = "dataset", deserialize_with = "null_as_default")]
    pub profiles: ApiDatasetProfiles,
}

/// Row of `simulation` holding the configuration arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSimulationArguments {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: BTreeMap<String, Value>,
}
