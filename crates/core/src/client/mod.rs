//! Planning service client
//!
//! `PlanningClient` exposes one async method per remote capability. Each
//! method builds a GraphQL document and variables, sends it through the
//! [`HostSession`] once, classifies the envelope and converts the payload
//! through the wire and domain schema layers.

pub mod envelope;
mod models;
mod plans;
pub mod queries;
mod resources;
mod simulations;

pub use simulations::SimulationArguments;

use std::sync::Arc;

use plansim_domain::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::session_ports::{HostSession, Sleeper};

/// Client for a planning service deployment.
#[derive(Clone)]
pub struct PlanningClient {
    pub(crate) session: Arc<dyn HostSession>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
}

/// `{ id }` selection returned by inserts, updates and deletes.
#[derive(Debug, Deserialize)]
struct IdRow {
    id: i64,
}

/// `{ returning { ... } }` selection of bulk mutations.
#[derive(Debug, Deserialize)]
struct Returning<T> {
    returning: Vec<T>,
}

impl PlanningClient {
    pub fn new(session: Arc<dyn HostSession>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { session, sleeper }
    }

    /// Send `query` and return `data.<root>`.
    async fn request(&self, query: &str, variables: Value, root: &str) -> Result<Value> {
        debug!(operation = queries::operation_name(query), "sending graphql request");
        let response = self.session.send(query, variables).await?;
        envelope::extract(response, root)
    }

    /// Send a by-pk mutation or lookup and return the affected row's id.
    async fn request_id(&self, query: &str, variables: Value, root: &str, what: &str) -> Result<i64> {
        let row = envelope::required(self.request(query, variables, root).await?, what)?;
        Ok(envelope::decode::<IdRow>(row, what)?.id)
    }
}
