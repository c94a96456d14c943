//! End-to-end checks of `HttpHostSession` against a mock Hasura endpoint.

use std::sync::Arc;

use plansim_core::{HostSession, PlanningClient};
use plansim_domain::config::HttpConfig;
use plansim_domain::{ClientConfig, PlanError};
use plansim_infra::{HttpHostSession, TokioSleeper};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        graphql_url: format!("{}/v1/graphql", server.uri()),
        gateway_url: server.uri(),
        http: HttpConfig { timeout_secs: 5, max_attempts: 3, base_backoff_ms: 1 },
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn send_posts_query_and_variables_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .and(header("authorization", "Bearer tok"))
        .and(header("x-hasura-role", "aerie_admin"))
        .and(body_partial_json(json!({ "variables": { "id": 7 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth.token = Some("tok".into());
    config.auth.role = Some("aerie_admin".into());
    let session = HttpHostSession::from_config(&config).unwrap();

    let envelope = session.send("query Ping { ok }", json!({ "id": 7 })).await.unwrap();
    assert_eq!(envelope, json!({ "data": { "ok": true } }));
}

#[tokio::test]
async fn error_envelope_is_returned_untouched() {
    let server = MockServer::start().await;
    let body = json!({ "errors": [{ "message": "field 'nope' not found" }] });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let envelope = session.send("query Nope { nope }", json!({})).await.unwrap();
    assert_eq!(envelope, body);
}

#[tokio::test]
async fn non_success_status_with_envelope_is_passed_through() {
    let server = MockServer::start().await;
    let body = json!({ "errors": [{ "message": "bad request" }] });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    assert_eq!(session.send("query X { x }", json!({})).await.unwrap(), body);
}

#[tokio::test]
async fn unauthorized_status_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let err = session.send("query X { x }", json!({})).await.unwrap_err();
    assert!(matches!(err, PlanError::Auth(ref msg) if msg.contains("401")), "{err:?}");
}

#[tokio::test]
async fn server_errors_are_retried_then_reported_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let err = session.send("query X { x }", json!({})).await.unwrap_err();
    assert!(matches!(err, PlanError::Transport(ref msg) if msg.contains("503")), "{err:?}");
}

#[tokio::test]
async fn non_json_body_is_a_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let err = session.send("query X { x }", json!({})).await.unwrap_err();
    assert!(matches!(err, PlanError::SchemaValidation(_)), "{err:?}");
}

#[tokio::test]
async fn upload_file_posts_multipart_to_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let id = session.upload_file("banana.jar", b"PK\x03\x04".to_vec()).await.unwrap();
    assert_eq!(id, 42);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"banana.jar\""));
}

#[tokio::test]
async fn failed_upload_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = HttpHostSession::from_config(&config_for(&server)).unwrap();
    let err = session.upload_file("banana.jar", vec![1, 2, 3]).await.unwrap_err();
    assert!(matches!(err, PlanError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn planning_client_runs_over_http_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .and(body_partial_json(json!({ "variables": { "id": 3 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "plan_by_pk": {
                    "id": 3,
                    "model_id": 1,
                    "name": "banana-day",
                    "start_time": "2030-01-01T00:00:00+00:00",
                    "duration": "24:00:00",
                    "simulations": [{ "id": 9 }],
                    "activity_directives": [{
                        "id": 11,
                        "type": "PeelBanana",
                        "start_offset": "01:00:00",
                        "arguments": { "peelDirection": "fromStem" },
                        "name": "peel",
                        "tags": [],
                        "metadata": {},
                        "anchor_id": null,
                        "anchored_to_start": true
                    }]
                }
            }
        })))
        .mount(&server)
        .await;

    let session = Arc::new(HttpHostSession::from_config(&config_for(&server)).unwrap());
    let client = PlanningClient::new(session, Arc::new(TokioSleeper));

    let plan = client.get_activity_plan_by_id(3).await.unwrap();
    assert_eq!(plan.name, "banana-day");
    assert_eq!(plan.activities.len(), 1);
    assert_eq!(plan.activities[0].activity_type, "PeelBanana");
}
