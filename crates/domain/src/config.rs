//! Configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GATEWAY_URL, DEFAULT_GRAPHQL_URL, DEFAULT_HTTP_BASE_BACKOFF_MS,
    DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_PERIOD_SECS,
};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub graphql_url: String,
    pub gateway_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

/// Credentials handed to the host session.
///
/// Obtaining a token is someone else's job; the session only attaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default, skip_serializing)]
    pub admin_secret: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Total attempts per request, initial try included.
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

/// Simulation polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub period_secs: u64,
    pub max_polls: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            auth: AuthConfig::default(),
            http: HttpConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_HTTP_BASE_BACKOFF_MS,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { period_secs: DEFAULT_POLL_PERIOD_SECS, max_polls: None }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: ClientConfig = serde_json::from_value(json!({
            "graphql_url": "http://aerie:8080/v1/graphql",
            "gateway_url": "http://aerie:9000",
            "http": {"timeout_secs": 5},
            "poll": {"max_polls": 10}
        }))
        .unwrap();

        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_attempts, DEFAULT_HTTP_MAX_ATTEMPTS);
        assert_eq!(config.http.base_backoff_ms, DEFAULT_HTTP_BASE_BACKOFF_MS);
        assert_eq!(config.poll.period_secs, DEFAULT_POLL_PERIOD_SECS);
        assert_eq!(config.poll.max_polls, Some(10));
    }
}
