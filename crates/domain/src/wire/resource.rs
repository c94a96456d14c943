//! Resource type and profile shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_default;

/// One entry of the `resourceTypes` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResourceType {
    pub name: String,
    pub schema: Value,
}

/// A simulated resource profile: piecewise segments keyed by start offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiProfile {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_segments: Vec<ApiProfileSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiProfileSegment {
    pub start_offset: String,
    #[serde(default)]
    pub dynamics: Value,
}
