//! Mission model and metadata schema shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMissionModel {
    pub id: i64,
    pub name: String,
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mission: String,
}

/// `mission_model_insert_input`; `jar_id` comes from the gateway upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMissionModelInsert {
    pub name: String,
    pub version: String,
    pub mission: String,
    pub jar_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMetadataSchema {
    pub key: String,
    pub schema: Value,
}
