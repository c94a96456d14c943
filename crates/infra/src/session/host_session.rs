//! reqwest-backed [`HostSession`]

use async_trait::async_trait;
use plansim_core::HostSession;
use plansim_domain::constants::{ADMIN_SECRET_HEADER, ROLE_HEADER};
use plansim_domain::{ClientConfig, FileId, PlanError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::InfraError;
use crate::http::{HttpClient, HttpClientBuilder};

const USER_AGENT: &str = concat!("plansim/", env!("CARGO_PKG_VERSION"));

/// Session against a single deployment: a GraphQL endpoint plus the gateway
/// that accepts file uploads.
///
/// Credentials are baked into default headers when the session is built.
#[derive(Clone)]
pub struct HttpHostSession {
    http: HttpClient,
    graphql_url: Url,
    gateway_url: Url,
}

#[derive(Deserialize)]
struct UploadedFile {
    id: FileId,
}

impl HttpHostSession {
    /// # Errors
    /// Returns `PlanError::Config` for unparseable URLs or header values and
    /// `PlanError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let graphql_url = Url::parse(&config.graphql_url).map_err(|e| {
            PlanError::Config(format!("invalid GraphQL URL '{}': {e}", config.graphql_url))
        })?;
        let gateway_url = Url::parse(&config.gateway_url).map_err(|e| {
            PlanError::Config(format!("invalid gateway URL '{}': {e}", config.gateway_url))
        })?;

        let http = HttpClientBuilder::from_config(&config.http)
            .user_agent(USER_AGENT)
            .default_headers(auth_headers(config)?)
            .build()?;

        Ok(Self { http, graphql_url, gateway_url })
    }

    pub const fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    pub const fn gateway_url(&self) -> &Url {
        &self.gateway_url
    }

    fn upload_url(&self) -> Result<Url> {
        let mut base = self.gateway_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join("file").map_err(|e| InfraError::from(e).into())
    }
}

fn auth_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let auth = &config.auth;

    if let Some(token) = &auth.token {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"), "token")?);
    }
    if let Some(secret) = &auth.admin_secret {
        headers.insert(
            HeaderName::from_static(ADMIN_SECRET_HEADER),
            header_value(secret, "admin secret")?,
        );
    }
    if let Some(role) = &auth.role {
        headers.insert(HeaderName::from_static(ROLE_HEADER), header_value(role, "role")?);
    }

    Ok(headers)
}

fn header_value(raw: &str, what: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|_| PlanError::Config(format!("{what} is not a valid header value")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn reject_credentials(status: StatusCode) -> Option<PlanError> {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN).then(|| {
        PlanError::Auth(format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        ))
    })
}

async fn read_json(response: Response) -> Result<Value> {
    let body = response.bytes().await.map_err(InfraError::from)?;
    serde_json::from_slice(&body).map_err(|e| InfraError::from(e).into())
}

#[async_trait]
impl HostSession for HttpHostSession {
    #[instrument(skip(self, query, variables), fields(request_id))]
    async fn send(&self, query: &str, variables: Value) -> Result<Value> {
        let request_id = Uuid::now_v7();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let body = json!({ "query": query, "variables": variables });
        let builder = self.http.request(Method::POST, self.graphql_url.clone()).json(&body);
        let response = self.http.send(builder).await?;
        let status = response.status();
        debug!(%status, "GraphQL response received");

        if let Some(err) = reject_credentials(status) {
            return Err(err);
        }

        if status.is_success() {
            return read_json(response).await;
        }

        // Hasura reports some failures with a non-2xx status and a regular
        // error envelope. Hand those back for the client to classify.
        match read_json(response).await {
            Ok(envelope) if envelope.get("errors").is_some() => Ok(envelope),
            _ => {
                warn!(%status, "GraphQL endpoint returned an error status");
                Err(PlanError::Transport(format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("unknown status")
                )))
            }
        }
    }

    #[instrument(skip(self, contents), fields(size = contents.len()))]
    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<FileId> {
        let url = self.upload_url()?;
        let part = Part::bytes(contents).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let builder = self.http.request(Method::POST, url).multipart(form);
        let response = self.http.send_once(builder).await?;
        let status = response.status();

        if let Some(err) = reject_credentials(status) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(PlanError::Transport(format!(
                "file upload failed with HTTP {}",
                status.as_u16()
            )));
        }

        let uploaded: UploadedFile = serde_json::from_value(read_json(response).await?)
            .map_err(|e| PlanError::SchemaValidation(format!("unexpected upload response: {e}")))?;
        debug!(file_id = uploaded.id, "file uploaded");
        Ok(uploaded.id)
    }
}
