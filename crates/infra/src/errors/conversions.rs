//! Conversions from external infrastructure errors into domain errors.

use plansim_domain::PlanError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PlanError);

impl From<InfraError> for PlanError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PlanError> for InfraError {
    fn from(value: PlanError) -> Self {
        Self(value)
    }
}

trait IntoPlanError {
    fn into_plan_error(self) -> PlanError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PlanError */
/* -------------------------------------------------------------------------- */

impl IntoPlanError for HttpError {
    fn into_plan_error(self) -> PlanError {
        if self.is_timeout() {
            return PlanError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PlanError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PlanError::Auth(message),
                _ => PlanError::Transport(message),
            };
        }

        if self.is_decode() {
            return PlanError::Transport(format!("undecodable HTTP response body: {self}"));
        }

        PlanError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_plan_error())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PlanError */
/* -------------------------------------------------------------------------- */

impl IntoPlanError for JsonError {
    fn into_plan_error(self) -> PlanError {
        PlanError::SchemaValidation(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_plan_error())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → PlanError */
/* -------------------------------------------------------------------------- */

impl IntoPlanError for UrlError {
    fn into_plan_error(self) -> PlanError {
        PlanError::Config(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        Self(value.into_plan_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
