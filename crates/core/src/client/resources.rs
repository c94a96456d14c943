//! Resource and sequence operations

use plansim_domain::wire::{ApiResourceType, ApiSimulationResults};
use plansim_domain::{
    timelines_from_profiles, DatasetId, ModelId, PlanError, PlanId, ResourceTimelines,
    ResourceType, Result, SimulationDataset,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{envelope, queries, PlanningClient};

impl PlanningClient {
    #[instrument(skip(self))]
    pub async fn get_resource_types(&self, model_id: ModelId) -> Result<Vec<ResourceType>> {
        let rows = self
            .request(
                queries::GET_RESOURCE_TYPES,
                json!({ "missionModelId": model_id }),
                "resourceTypes",
            )
            .await?;
        let wire: Vec<ApiResourceType> = envelope::decode(rows, "resource types")?;
        wire.iter().map(ResourceType::from_wire).collect()
    }

    /// Sampled resources from the most recent simulation of a plan.
    ///
    /// `filter` entries match a resource's full name or its last path
    /// segment; an empty filter returns every resource.
    #[instrument(skip(self))]
    pub async fn get_resource_samples(
        &self,
        plan_id: PlanId,
        filter: &[String],
    ) -> Result<ResourceTimelines> {
        let rows = self
            .request(
                queries::GET_LATEST_DATASET_PROFILES,
                json!({ "planId": plan_id }),
                "simulation_dataset",
            )
            .await?;
        let mut datasets: Vec<ApiSimulationResults> = envelope::decode(rows, "simulation datasets")?;
        let latest = datasets
            .pop()
            .ok_or_else(|| PlanError::Api(format!("plan {plan_id} has no simulation datasets")))?;
        sample(&latest, filter)
    }

    #[instrument(skip(self))]
    pub async fn get_resource_samples_for_dataset(
        &self,
        dataset_id: DatasetId,
        filter: &[String],
    ) -> Result<ResourceTimelines> {
        let what = format!("simulation dataset {dataset_id}");
        let row = self
            .request(
                queries::GET_DATASET_PROFILES,
                json!({ "id": dataset_id }),
                "simulation_dataset_by_pk",
            )
            .await?;
        let wire: ApiSimulationResults = envelope::decode(envelope::required(row, &what)?, &what)?;
        sample(&wire, filter)
    }

    /// Compile an EDSL sequence to its JSON form.
    #[instrument(skip(self, edsl_body))]
    pub async fn get_sequence_json(
        &self,
        command_dictionary_id: i64,
        edsl_body: &str,
    ) -> Result<Value> {
        let sequence = self
            .request(
                queries::GET_SEQUENCE_JSON,
                json!({ "commandDictionaryId": command_dictionary_id, "edslBody": edsl_body }),
                "getUserSequenceSeqJson",
            )
            .await?;
        envelope::required(sequence, "compiled sequence")
    }
}

fn sample(wire: &ApiSimulationResults, filter: &[String]) -> Result<ResourceTimelines> {
    let dataset = SimulationDataset::from_wire(&wire.dataset)?;
    timelines_from_profiles(&wire.profiles.profiles, filter, dataset.span())
}
