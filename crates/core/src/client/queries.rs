//! GraphQL documents
//!
//! One named operation per document. Tests and logs identify requests by
//! the operation name, so keep names unique.

pub const LIST_PLANS: &str = r"query ListPlans {
  plan(order_by: {id: asc}) {
    id model_id name start_time duration
    simulations { id }
  }
}";

pub const GET_PLAN: &str = r"query GetPlan($id: Int!) {
  plan_by_pk(id: $id) {
    id model_id name start_time duration
    simulations { id }
    activity_directives(order_by: {id: asc}) {
      id type start_offset arguments name tags metadata anchor_id anchored_to_start
    }
  }
}";

pub const CREATE_PLAN: &str = r"mutation CreatePlan($plan: plan_insert_input!) {
  insert_plan_one(object: $plan) { id }
}";

pub const UPDATE_PLAN: &str = r"mutation UpdatePlan($id: Int!, $plan: plan_set_input!) {
  update_plan_by_pk(pk_columns: {id: $id}, _set: $plan) { id }
}";

pub const DELETE_PLAN: &str = r"mutation DeletePlan($id: Int!) {
  delete_simulation(where: {plan_id: {_eq: $id}}) { affected_rows }
  delete_plan_by_pk(id: $id) { id }
}";

pub const CREATE_SIMULATION: &str = r"mutation CreateSimulation($simulation: simulation_insert_input!) {
  insert_simulation_one(object: $simulation) { id }
}";

pub const CREATE_ACTIVITY: &str = r"mutation CreateActivity($activity: activity_directive_insert_input!) {
  insert_activity_directive_one(object: $activity) { id }
}";

pub const UPDATE_ACTIVITY: &str = r"mutation UpdateActivity($id: Int!, $planId: Int!, $activity: activity_directive_set_input!) {
  update_activity_directive_by_pk(pk_columns: {id: $id, plan_id: $planId}, _set: $activity) { id }
}";

pub const DELETE_ACTIVITY: &str = r"mutation DeleteActivity($id: Int!, $planId: Int!) {
  delete_activity_directive_by_pk(id: $id, plan_id: $planId) { id }
}";

pub const SIMULATE: &str = r"query Simulate($planId: Int!) {
  simulate(planId: $planId) { status reason simulationDatasetId }
}";

pub const GET_SIMULATION_DATASET: &str = r"query GetSimulationDataset($id: Int!) {
  simulation_dataset_by_pk(id: $id) {
    id status reason simulation { plan_id } simulation_start_time simulation_end_time
  }
}";

pub const GET_SIMULATION_RESULTS: &str = r"query GetSimulationResults($id: Int!) {
  simulation_dataset_by_pk(id: $id) {
    id status reason simulation { plan_id } simulation_start_time simulation_end_time
    simulated_activities(order_by: {id: asc}) {
      id activity_type_name start_offset duration parent_id attributes
    }
    dataset {
      profiles { name profile_segments(order_by: {start_offset: asc}) { start_offset dynamics } }
    }
  }
}";

pub const GET_DATASET_PROFILES: &str = r"query GetDatasetProfiles($id: Int!) {
  simulation_dataset_by_pk(id: $id) {
    id status reason simulation { plan_id } simulation_start_time simulation_end_time
    dataset {
      profiles { name profile_segments(order_by: {start_offset: asc}) { start_offset dynamics } }
    }
  }
}";

pub const GET_LATEST_DATASET_PROFILES: &str = r"query GetLatestDatasetProfiles($planId: Int!) {
  simulation_dataset(where: {simulation: {plan_id: {_eq: $planId}}}, order_by: {id: desc}, limit: 1) {
    id status reason simulation { plan_id } simulation_start_time simulation_end_time
    dataset {
      profiles { name profile_segments(order_by: {start_offset: asc}) { start_offset dynamics } }
    }
  }
}";

pub const GET_DATASET_IDS_FOR_PLAN: &str = r"query GetSimulationDatasetIds($planId: Int!) {
  simulation_dataset(where: {simulation: {plan_id: {_eq: $planId}}}, order_by: {id: asc}) { id }
}";

pub const GET_SIMULATION_ARGUMENTS: &str = r"query GetSimulationArguments($planId: Int!) {
  simulation(where: {plan_id: {_eq: $planId}}, order_by: {id: desc}, limit: 1) { id arguments }
}";

pub const SET_SIMULATION_ARGUMENTS: &str = r"mutation SetSimulationArguments($planId: Int!, $arguments: jsonb!) {
  update_simulation(where: {plan_id: {_eq: $planId}}, _set: {arguments: $arguments}) {
    returning { id arguments }
  }
}";

pub const GET_RESOURCE_TYPES: &str = r"query GetResourceTypes($missionModelId: ID!) {
  resourceTypes(missionModelId: $missionModelId) { name schema }
}";

pub const GET_SEQUENCE_JSON: &str = r"query GetSequenceJson($commandDictionaryId: Int!, $edslBody: String!) {
  getUserSequenceSeqJson(commandDictionaryID: $commandDictionaryId, edslBody: $edslBody) {
    id metadata steps
  }
}";

pub const LIST_MISSION_MODELS: &str = r"query ListMissionModels {
  mission_model(order_by: {id: asc}) { id name version mission }
}";

pub const CREATE_MISSION_MODEL: &str = r"mutation CreateMissionModel($model: mission_model_insert_input!) {
  insert_mission_model_one(object: $model) { id }
}";

pub const DELETE_MISSION_MODEL: &str = r"mutation DeleteMissionModel($id: Int!) {
  delete_mission_model_by_pk(id: $id) { id }
}";

pub const LIST_METADATA_SCHEMAS: &str = r"query ListMetadataSchemas {
  activity_directive_metadata_schema(order_by: {key: asc}) { key schema }
}";

pub const ADD_METADATA_SCHEMAS: &str = r"mutation AddMetadataSchemas($schemas: [activity_directive_metadata_schema_insert_input!]!) {
  insert_activity_directive_metadata_schema(objects: $schemas) { returning { key schema } }
}";

pub const DELETE_METADATA_SCHEMA: &str = r"mutation DeleteMetadataSchema($key: String!) {
  delete_activity_directive_metadata_schema_by_pk(key: $key) { key }
}";

/// Operation name of a document, for logs.
pub fn operation_name(query: &str) -> &str {
    query
        .split_whitespace()
        .nth(1)
        .map_or("anonymous", |name| name.split(['(', '{']).next().unwrap_or(name))
}
