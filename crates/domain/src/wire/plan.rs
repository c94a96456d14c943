//! Plan and activity directive shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{default_true, null_as_default};

/// Row of the `plan` table as selected by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiActivityPlanRead {
    pub id: i64,
    pub model_id: i64,
    pub name: String,
    pub start_time: String,
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub simulations: Vec<ApiSimulationRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activity_directives: Vec<ApiActivityRead>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSimulationRef {
    pub id: i64,
}

/// Columns shared by every activity directive payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiActivityBody {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub start_offset: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, Value>,
    #[serde(default)]
    pub anchor_id: Option<i64>,
    #[serde(default = "default_true")]
    pub anchored_to_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiActivityRead {
    pub id: i64,
    #[serde(flatten)]
    pub body: ApiActivityBody,
}

/// `activity_directive_insert_input`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiActivityInsert {
    pub plan_id: i64,
    #[serde(flatten)]
    pub body: ApiActivityBody,
}

/// Activity inside a plan upload; the id is only a local reference for anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiActivityDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub body: ApiActivityBody,
}

/// `plan_insert_input`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiActivityPlanCreate {
    pub model_id: i64,
    pub name: String,
    pub start_time: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPlanCreatePayload {
    pub plan: ApiActivityPlanCreate,
    #[serde(default)]
    pub activities: Vec<ApiActivityDraft>,
}

/// `plan_set_input`; unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPlanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}
