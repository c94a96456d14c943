//! Mission model and metadata schema operations

use plansim_domain::wire::{ApiMetadataSchema, ApiMissionModel};
use plansim_domain::{
    MetadataSchema, MissionModel, MissionModelUpload, ModelId, PlanError, Result,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::{envelope, queries, PlanningClient, Returning};

#[derive(Debug, Deserialize)]
struct KeyRow {
    key: String,
}

impl PlanningClient {
    /// Upload the model jar through the gateway, then register the model.
    #[instrument(skip(self, upload), fields(name = %upload.name, version = %upload.version))]
    pub async fn upload_mission_model(&self, upload: &MissionModelUpload) -> Result<ModelId> {
        let jar_id = self.session.upload_file(&upload.jar_name, upload.jar.clone()).await?;
        let model_id = self
            .request_id(
                queries::CREATE_MISSION_MODEL,
                json!({ "model": upload.to_insert(jar_id) }),
                "insert_mission_model_one",
                "created mission model",
            )
            .await?;
        info!(model_id, jar_id, "uploaded mission model");
        Ok(model_id)
    }

    #[instrument(skip(self))]
    pub async fn list_mission_models(&self) -> Result<Vec<MissionModel>> {
        let rows = self.request(queries::LIST_MISSION_MODELS, json!({}), "mission_model").await?;
        let wire: Vec<ApiMissionModel> = envelope::decode(rows, "mission model list")?;
        Ok(wire.iter().map(MissionModel::from_wire).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_mission_model(&self, model_id: ModelId) -> Result<ModelId> {
        self.request_id(
            queries::DELETE_MISSION_MODEL,
            json!({ "id": model_id }),
            "delete_mission_model_by_pk",
            &format!("mission model {model_id}"),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_metadata_schemas(&self) -> Result<Vec<MetadataSchema>> {
        let rows = self
            .request(queries::LIST_METADATA_SCHEMAS, json!({}), "activity_directive_metadata_schema")
            .await?;
        let wire: Vec<ApiMetadataSchema> = envelope::decode(rows, "metadata schema list")?;
        wire.iter().map(MetadataSchema::from_wire).collect()
    }

    /// Register activity metadata keys; returns the rows the server stored.
    #[instrument(skip(self, schemas), fields(count = schemas.len()))]
    pub async fn add_metadata_schemas(
        &self,
        schemas: &[MetadataSchema],
    ) -> Result<Vec<MetadataSchema>> {
        if schemas.is_empty() {
            return Err(PlanError::SchemaValidation("no metadata schemas to add".to_string()));
        }
        let objects = schemas.iter().map(MetadataSchema::to_wire).collect::<Result<Vec<_>>>()?;
        let inserted = self
            .request(
                queries::ADD_METADATA_SCHEMAS,
                json!({ "schemas": objects }),
                "insert_activity_directive_metadata_schema",
            )
            .await?;
        let inserted = envelope::required(inserted, "inserted metadata schemas")?;
        let rows: Returning<ApiMetadataSchema> = envelope::decode(inserted, "inserted metadata schemas")?;
        rows.returning.iter().map(MetadataSchema::from_wire).collect()
    }

    /// Delete a metadata key; returns the key the server removed.
    #[instrument(skip(self))]
    pub async fn delete_metadata_schema(&self, key: &str) -> Result<String> {
        let what = format!("metadata schema '{key}'");
        let row = self
            .request(
                queries::DELETE_METADATA_SCHEMA,
                json!({ "key": key }),
                "delete_activity_directive_metadata_schema_by_pk",
            )
            .await?;
        let row: KeyRow = envelope::decode(envelope::required(row, &what)?, &what)?;
        Ok(row.key)
    }
}
