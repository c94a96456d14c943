//! Mission models and activity metadata schemas

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FileId, ModelId};
use crate::errors::{PlanError, Result};
use crate::wire::{ApiMetadataSchema, ApiMissionModel, ApiMissionModelInsert};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionModel {
    pub id: ModelId,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub mission: String,
}

impl MissionModel {
    pub fn from_wire(wire: &ApiMissionModel) -> Self {
        Self {
            id: wire.id,
            name: wire.name.clone(),
            version: wire.version.clone(),
            mission: wire.mission.clone(),
        }
    }
}

/// A compiled mission model ready to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MissionModelUpload {
    pub name: String,
    pub version: String,
    pub mission: String,
    /// File name reported to the gateway.
    pub jar_name: String,
    pub jar: Vec<u8>,
}

impl MissionModelUpload {
    pub fn to_insert(&self, jar_id: FileId) -> ApiMissionModelInsert {
        ApiMissionModelInsert {
            name: self.name.clone(),
            version: self.version.clone(),
            mission: self.mission.clone(),
            jar_id,
        }
    }
}

impl fmt::Debug for MissionModelUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissionModelUpload")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("mission", &self.mission)
            .field("jar_name", &self.jar_name)
            .field("jar_len", &self.jar.len())
            .finish()
    }
}

/// Value type accepted by an activity metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataValueType {
    String,
    LongString,
    Boolean,
    Number,
    Enum { enumerates: Vec<String> },
    EnumMultiselect { enumerates: Vec<String> },
}

impl MetadataValueType {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::LongString => "long_string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Enum { .. } => "enum",
            Self::EnumMultiselect { .. } => "enum_multiselect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSchema {
    pub key: String,
    pub schema: MetadataValueType,
}

impl MetadataSchema {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for unknown value types.
    pub fn from_wire(wire: &ApiMetadataSchema) -> Result<Self> {
        let schema = serde_json::from_value(wire.schema.clone()).map_err(|e| {
            PlanError::SchemaValidation(format!("metadata key '{}' has invalid schema: {e}", wire.key))
        })?;
        Ok(Self { key: wire.key.clone(), schema })
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` if the schema cannot be encoded.
    pub fn to_wire(&self) -> Result<ApiMetadataSchema> {
        let schema = serde_json::to_value(&self.schema)
            .map_err(|e| PlanError::SchemaValidation(e.to_string()))?;
        Ok(ApiMetadataSchema { key: self.key.clone(), schema })
    }
}
