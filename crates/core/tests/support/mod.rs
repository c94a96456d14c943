//! Shared test helpers for `plansim-core` integration tests.
//!
//! Fake host sessions and a recording sleeper so client tests can assert on
//! exactly which requests were made without a network.

#![allow(dead_code)]

pub mod host;
pub mod session;

use std::sync::Arc;

use plansim_core::PlanningClient;

pub use host::FakePlanningHost;
pub use session::{RecordingSleeper, ScriptedSession};

/// Client wired to a scripted session and a recording sleeper.
pub fn scripted_client(
    responses: Vec<serde_json::Value>,
) -> (PlanningClient, Arc<ScriptedSession>, Arc<RecordingSleeper>) {
    let session = Arc::new(ScriptedSession::new(responses));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = PlanningClient::new(session.clone(), sleeper.clone());
    (client, session, sleeper)
}
