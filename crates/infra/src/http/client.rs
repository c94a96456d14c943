//! Retrying HTTP transport.

use std::time::Duration;

use plansim_domain::config::HttpConfig;
use plansim_domain::PlanError;
use reqwest::header::HeaderMap;
use reqwest::{Client, IntoUrl, Method, Request, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::errors::InfraError;

/// Longest backoff step, as a power of two of the base delay.
const MAX_BACKOFF_DOUBLINGS: u32 = 8;

/// When a failed attempt is tried again and how long to wait first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.base_backoff_ms))
    }

    /// Total attempts, first try included.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before attempt `failed + 1`: the base delay doubled per earlier
    /// failure.
    pub fn backoff(&self, failed: u32) -> Duration {
        let doublings = failed.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
        self.base_backoff.saturating_mul(1 << doublings)
    }

    fn retries_status(status: StatusCode) -> bool {
        status.is_server_error()
    }

    /// Only failures to connect: a request that timed out may already have
    /// been applied, and replaying an insert would duplicate the row.
    fn retries_error(err: &reqwest::Error) -> bool {
        err.is_connect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

/// reqwest client plus a [`RetryPolicy`].
///
/// 5xx responses and connection failures are retried; timeouts are not.
/// Once the policy is spent the last response or error is returned as is.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send with retries.
    ///
    /// # Errors
    /// `PlanError::Transport` when the last attempt fails to produce a
    /// response or when the body is a stream that cannot be replayed.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PlanError> {
        let template = build(builder)?;
        debug!(method = %template.method(), url = %template.url(), "sending HTTP request");

        let mut attempt = 1;
        loop {
            let request = template.try_clone().ok_or_else(|| {
                PlanError::Transport("streaming request bodies cannot be retried".to_string())
            })?;
            let outcome = self.inner.execute(request).await;

            let retry = attempt < self.retry.max_attempts
                && match &outcome {
                    Ok(response) => RetryPolicy::retries_status(response.status()),
                    Err(err) => RetryPolicy::retries_error(err),
                };
            if !retry {
                return outcome.map_err(|err| InfraError::from(err).into());
            }

            let delay = self.retry.backoff(attempt);
            match &outcome {
                Ok(response) => {
                    debug!(attempt, status = %response.status(), ?delay, "retrying HTTP request");
                }
                Err(err) => debug!(attempt, error = %err, ?delay, "retrying HTTP request"),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Send exactly once, for bodies that cannot be cloned.
    ///
    /// # Errors
    /// `PlanError::Transport` when the request fails.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, PlanError> {
        let request = build(builder)?;
        debug!(method = %request.method(), url = %request.url(), "sending HTTP request once");
        self.inner.execute(request).await.map_err(|err| InfraError::from(err).into())
    }
}

fn build(builder: RequestBuilder) -> Result<Request, PlanError> {
    builder.build().map_err(|err| InfraError::from(err).into())
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    retry: RetryPolicy,
    user_agent: Option<String>,
    headers: HeaderMap,
}

impl HttpClientBuilder {
    /// Timeout and retry settings taken from `config`.
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            timeout: Some(Duration::from_secs(config.timeout_secs)),
            retry: RetryPolicy::from_config(config),
            user_agent: None,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// # Errors
    /// `PlanError::Transport` if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, PlanError> {
        let mut builder = Client::builder().no_proxy().default_headers(self.headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let inner = builder.build().map_err(|err| PlanError::from(InfraError::from(err)))?;
        Ok(HttpClient { inner, retry: self.retry })
    }
}
