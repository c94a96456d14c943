//! Simulation dataset and configuration operations

use std::collections::BTreeMap;

use plansim_domain::wire::{
    ApiSimulateResponse, ApiSimulationArguments, ApiSimulationDataset, ApiSimulationResults,
};
use plansim_domain::{
    DatasetId, PlanError, PlanId, Result, SimulationDataset, SimulationResults,
    SimulationStatusReport,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{envelope, queries, PlanningClient, Returning};

/// Simulation configuration arguments.
pub type SimulationArguments = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
struct DatasetIdRow {
    id: DatasetId,
}

impl PlanningClient {
    /// Ask the service to simulate a plan and report the dataset it started.
    #[instrument(skip(self))]
    pub async fn submit_simulation(&self, plan_id: PlanId) -> Result<SimulationStatusReport> {
        let what = format!("simulation of plan {plan_id}");
        let response = self
            .request(queries::SIMULATE, json!({ "planId": plan_id }), "simulate")
            .await?;
        let wire: ApiSimulateResponse = envelope::decode(envelope::required(response, &what)?, &what)?;
        let report = SimulationStatusReport::from_wire(&wire)?;
        info!(dataset_id = report.dataset_id, status = %report.status, "submitted simulation");
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn get_simulation_dataset(&self, dataset_id: DatasetId) -> Result<SimulationDataset> {
        let what = format!("simulation dataset {dataset_id}");
        let row = self
            .request(
                queries::GET_SIMULATION_DATASET,
                json!({ "id": dataset_id }),
                "simulation_dataset_by_pk",
            )
            .await?;
        let wire: ApiSimulationDataset = envelope::decode(envelope::required(row, &what)?, &what)?;
        SimulationDataset::from_wire(&wire)
    }

    /// Dataset record, simulated activities and resource timelines.
    #[instrument(skip(self))]
    pub async fn get_simulation_results(&self, dataset_id: DatasetId) -> Result<SimulationResults> {
        let what = format!("simulation dataset {dataset_id}");
        let row = self
            .request(
                queries::GET_SIMULATION_RESULTS,
                json!({ "id": dataset_id }),
                "simulation_dataset_by_pk",
            )
            .await?;
        let wire: ApiSimulationResults = envelope::decode(envelope::required(row, &what)?, &what)?;
        SimulationResults::from_wire(&wire)
    }

    /// Ids of every dataset simulated from a plan, oldest first.
    #[instrument(skip(self))]
    pub async fn get_simulation_dataset_ids_by_plan_id(&self, plan_id: PlanId) -> Result<Vec<DatasetId>> {
        let rows = self
            .request(
                queries::GET_DATASET_IDS_FOR_PLAN,
                json!({ "planId": plan_id }),
                "simulation_dataset",
            )
            .await?;
        let rows: Vec<DatasetIdRow> = envelope::decode(rows, "simulation dataset ids")?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_simulation_arguments(&self, plan_id: PlanId) -> Result<SimulationArguments> {
        let rows = self
            .request(
                queries::GET_SIMULATION_ARGUMENTS,
                json!({ "planId": plan_id }),
                "simulation",
            )
            .await?;
        let mut rows: Vec<ApiSimulationArguments> = envelope::decode(rows, "simulation arguments")?;
        rows.pop()
            .map(|row| row.arguments)
            .ok_or_else(|| PlanError::Api(format!("plan {plan_id} has no simulation configuration")))
    }

    /// Replace a plan's simulation arguments.
    #[instrument(skip(self, arguments))]
    pub async fn create_config(
        &self,
        plan_id: PlanId,
        arguments: &SimulationArguments,
    ) -> Result<SimulationArguments> {
        let updated = self
            .request(
                queries::SET_SIMULATION_ARGUMENTS,
                json!({ "planId": plan_id, "arguments": arguments }),
                "update_simulation",
            )
            .await?;
        let what = format!("simulation configuration of plan {plan_id}");
        let rows: Returning<ApiSimulationArguments> =
            envelope::decode(envelope::required(updated, &what)?, &what)?;
        rows.returning
            .into_iter()
            .last()
            .map(|row| row.arguments)
            .ok_or_else(|| PlanError::Api(format!("{what} not found")))
    }

    /// Merge `arguments` over a plan's current simulation arguments.
    #[instrument(skip(self, arguments))]
    pub async fn update_config(
        &self,
        plan_id: PlanId,
        arguments: &SimulationArguments,
    ) -> Result<SimulationArguments> {
        let mut merged = self.get_simulation_arguments(plan_id).await?;
        merged.extend(arguments.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.create_config(plan_id, &merged).await
    }
}
