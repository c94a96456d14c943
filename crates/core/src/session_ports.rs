//! Host session port interfaces
//!
//! The client never talks HTTP itself. Everything that leaves the process
//! goes through these traits so tests can script the remote side.

use std::time::Duration;

use async_trait::async_trait;
use plansim_domain::{FileId, Result};
use serde_json::Value;

/// Authenticated connection to a planning service deployment.
///
/// Implementations own base URLs, credentials, timeouts and retries.
/// Headers are fixed at construction so a session can be shared freely.
#[async_trait]
pub trait HostSession: Send + Sync {
    /// Post a GraphQL document and return the raw response envelope
    /// (`{"data": ..., "errors": [...]}`) without interpreting it.
    ///
    /// Fails with `Transport` for network or HTTP failures and `Auth` when
    /// the service rejects the credentials outright.
    async fn send(&self, query: &str, variables: Value) -> Result<Value>;

    /// Upload a file through the gateway and return its id.
    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<FileId>;
}

/// Suspends the caller between simulation polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, period: Duration);
}
