//! Mission models, metadata schemas and simulation configuration.

mod support;

use std::collections::BTreeMap;

use plansim_domain::{MetadataSchema, MetadataValueType, MissionModelUpload, PlanError};
use serde_json::json;
use support::scripted_client;

#[tokio::test]
async fn upload_sends_jar_then_registers_model() {
    let (client, session, _) =
        scripted_client(vec![json!({"data": {"insert_mission_model_one": {"id": 4}}})]);
    let upload = MissionModelUpload {
        name: "banananation".into(),
        version: "0.0.1".into(),
        mission: String::new(),
        jar_name: "banananation-1.6.2.jar".into(),
        jar: vec![1, 2, 3],
    };

    let model_id = client.upload_mission_model(&upload).await.unwrap();

    assert_eq!(model_id, 4);
    assert_eq!(session.uploads(), vec![("banananation-1.6.2.jar".to_string(), 3)]);
    assert_eq!(
        session.requests()[0].variables,
        json!({"model": {"name": "banananation", "version": "0.0.1", "mission": "", "jar_id": 101}})
    );
}

#[tokio::test]
async fn lists_and_deletes_models() {
    let (client, session, _) = scripted_client(vec![
        json!({"data": {"mission_model": [
            {"id": 1, "name": "banananation", "version": "0.0.1", "mission": null}
        ]}}),
        json!({"data": {"delete_mission_model_by_pk": {"id": 1}}}),
    ]);

    let models = client.list_mission_models().await.unwrap();
    assert_eq!(models[0].name, "banananation");
    assert_eq!(models[0].mission, "");

    assert_eq!(client.delete_mission_model(1).await.unwrap(), 1);
    assert_eq!(session.operations(), vec!["ListMissionModels", "DeleteMissionModel"]);
}

#[tokio::test]
async fn deleting_missing_model_is_api_error() {
    let (client, _, _) =
        scripted_client(vec![json!({"data": {"delete_mission_model_by_pk": null}})]);

    let err = client.delete_mission_model(9).await.unwrap_err();

    assert!(matches!(err, PlanError::Api(ref m) if m == "mission model 9 not found"));
}

#[tokio::test]
async fn metadata_schemas_round_trip() {
    let (client, session, _) = scripted_client(vec![
        json!({"data": {"insert_activity_directive_metadata_schema": {"returning": [
            {"key": "owner", "schema": {"type": "string"}},
            {"key": "priority", "schema": {"type": "enum", "enumerates": ["low", "high"]}}
        ]}}}),
        json!({"data": {"activity_directive_metadata_schema": [
            {"key": "owner", "schema": {"type": "string"}}
        ]}}),
        json!({"data": {"delete_activity_directive_metadata_schema_by_pk": {"key": "owner"}}}),
    ]);
    let schemas = vec![
        MetadataSchema { key: "owner".into(), schema: MetadataValueType::String },
        MetadataSchema {
            key: "priority".into(),
            schema: MetadataValueType::Enum { enumerates: vec!["low".into(), "high".into()] },
        },
    ];

    assert_eq!(client.add_metadata_schemas(&schemas).await.unwrap(), schemas);
    assert_eq!(
        session.requests()[0].variables["schemas"][1],
        json!({"key": "priority", "schema": {"type": "enum", "enumerates": ["low", "high"]}})
    );
    assert_eq!(client.list_metadata_schemas().await.unwrap().len(), 1);
    assert_eq!(client.delete_metadata_schema("owner").await.unwrap(), "owner");
}

#[tokio::test]
async fn update_config_merges_over_current_arguments() {
    let (client, session, _) = scripted_client(vec![
        json!({"data": {"simulation": [
            {"id": 2, "arguments": {"initialPlantCount": 2, "initialProducer": "nobody"}}
        ]}}),
        json!({"data": {"update_simulation": {"returning": [
            {"id": 2, "arguments": {"initialPlantCount": 3, "initialProducer": "nobody"}}
        ]}}}),
    ]);
    let update = BTreeMap::from([("initialPlantCount".to_string(), json!(3))]);

    let arguments = client.update_config(1, &update).await.unwrap();

    assert_eq!(arguments["initialPlantCount"], json!(3));
    assert_eq!(session.operations(), vec!["GetSimulationArguments", "SetSimulationArguments"]);
    assert_eq!(
        session.requests()[1].variables,
        json!({"planId": 1, "arguments": {"initialPlantCount": 3, "initialProducer": "nobody"}})
    );
}

#[tokio::test]
async fn create_config_replaces_arguments() {
    let (client, session, _) = scripted_client(vec![json!({"data": {"update_simulation": {"returning": [
        {"id": 2, "arguments": {"initialPlantCount": 2}}
    ]}}})]);
    let arguments = BTreeMap::from([("initialPlantCount".to_string(), json!(2))]);

    assert_eq!(client.create_config(1, &arguments).await.unwrap(), arguments);
    assert_eq!(session.operations(), vec!["SetSimulationArguments"]);
}

#[tokio::test]
async fn dataset_ids_are_listed_oldest_first() {
    let (client, _, _) = scripted_client(vec![json!({"data": {"simulation_dataset": [
        {"id": 3}, {"id": 8}
    ]}})]);

    assert_eq!(client.get_simulation_dataset_ids_by_plan_id(1).await.unwrap(), vec![3, 8]);
}
