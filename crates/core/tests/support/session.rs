use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use plansim_core::client::queries::operation_name;
use plansim_core::{HostSession, Sleeper};
use plansim_domain::{FileId, PlanError, Result as DomainResult};
use serde_json::Value;

/// A request as the session saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation: String,
    pub variables: Value,
}

/// Host session that replays canned envelopes in order.
///
/// Running out of responses is reported as a transport error so a test that
/// sends too many requests fails loudly.
#[derive(Default)]
pub struct ScriptedSession {
    responses: Mutex<VecDeque<DomainResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    uploads: Mutex<Vec<(String, usize)>>,
}

impl ScriptedSession {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    /// Queue a failure instead of an envelope.
    pub fn push_error(&self, error: PlanError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.operation).collect()
    }

    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl HostSession for ScriptedSession {
    async fn send(&self, query: &str, variables: Value) -> DomainResult<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            operation: operation_name(query).to_string(),
            variables,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlanError::Transport("no scripted response left".into())))
    }

    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> DomainResult<FileId> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((file_name.to_string(), contents.len()));
        Ok(i64::try_from(uploads.len()).unwrap() + 100)
    }
}

/// Sleeper that returns immediately and remembers every requested period.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, period: Duration) {
        self.sleeps.lock().unwrap().push(period);
    }
}
