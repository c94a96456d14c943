//! GraphQL response envelope classification
//!
//! Hasura answers most failures with HTTP 200 and an `errors` array, so the
//! status code alone says little. Every response goes through [`extract`]
//! before any of it is trusted.

use plansim_domain::constants::AUTH_ERROR_CODES;
use plansim_domain::{PlanError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Pull `data.<root>` out of an envelope.
///
/// The field itself may be `null` (a by-pk miss); callers that need a row
/// follow up with [`required`].
///
/// # Errors
/// - `Auth` when any error carries an auth-class extension code
/// - `Api` for any other `errors` entry, messages joined with `; `
/// - `SchemaValidation` when `data` or the root field is missing
pub fn extract(mut envelope: Value, root: &str) -> Result<Value> {
    if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return Err(classify_errors(errors));
        }
    }

    let data = match envelope.get_mut("data").map(Value::take) {
        Some(Value::Object(data)) => data,
        Some(Value::Null) | None => {
            return Err(PlanError::SchemaValidation("response has no data".to_string()));
        }
        Some(other) => {
            return Err(PlanError::SchemaValidation(format!(
                "response data is not an object: {other}"
            )));
        }
    };

    data.get(root).cloned().ok_or_else(|| {
        PlanError::SchemaValidation(format!("response data has no '{root}' field"))
    })
}

/// Reject a `null` row returned for a lookup or mutation by primary key.
///
/// # Errors
/// Returns `PlanError::Api` naming `what` when `value` is `null`.
pub fn required(value: Value, what: &str) -> Result<Value> {
    if value.is_null() {
        return Err(PlanError::Api(format!("{what} not found")));
    }
    Ok(value)
}

/// # Errors
/// Returns `PlanError::SchemaValidation` when `value` does not have the
/// shape of `T`.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| PlanError::SchemaValidation(format!("unexpected {what} shape: {e}")))
}

fn classify_errors(errors: &[Value]) -> PlanError {
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
        .collect();
    let joined = messages.join("; ");

    let auth_failure = errors.iter().any(|e| {
        e.pointer("/extensions/code")
            .and_then(Value::as_str)
            .is_some_and(|code| AUTH_ERROR_CODES.contains(&code))
    });

    if auth_failure {
        PlanError::Auth(joined)
    } else {
        PlanError::Api(joined)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn returns_root_field() {
        let envelope = json!({"data": {"plan_by_pk": {"id": 1}}});
        assert_eq!(extract(envelope, "plan_by_pk").unwrap(), json!({"id": 1}));
    }

    #[test]
    fn errors_array_becomes_api_error_with_joined_messages() {
        let envelope = json!({
            "errors": [
                {"message": "field 'x' not found", "extensions": {"code": "validation-failed"}},
                {"message": "second"}
            ]
        });
        match extract(envelope, "plan").unwrap_err() {
            PlanError::Api(message) => assert_eq!(message, "field 'x' not found; second"),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn auth_codes_become_auth_errors() {
        for code in AUTH_ERROR_CODES {
            let envelope = json!({
                "data": null,
                "errors": [{"message": "nope", "extensions": {"code": code}}]
            });
            assert!(matches!(extract(envelope, "plan"), Err(PlanError::Auth(_))), "{code}");
        }
    }

    #[test]
    fn missing_data_or_root_is_schema_error() {
        assert!(matches!(extract(json!({}), "plan"), Err(PlanError::SchemaValidation(_))));
        assert!(matches!(
            extract(json!({"data": null}), "plan"),
            Err(PlanError::SchemaValidation(_))
        ));
        assert!(matches!(
            extract(json!({"data": {"other": []}}), "plan"),
            Err(PlanError::SchemaValidation(_))
        ));
    }

    #[test]
    fn empty_errors_array_is_ignored() {
        let envelope = json!({"data": {"plan": []}, "errors": []});
        assert_eq!(extract(envelope, "plan").unwrap(), json!([]));
    }

    #[test]
    fn null_row_is_not_found() {
        let row = extract(json!({"data": {"plan_by_pk": null}}), "plan_by_pk").unwrap();
        match required(row, "plan 9").unwrap_err() {
            PlanError::Api(message) => assert_eq!(message, "plan 9 not found"),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let err = decode::<Vec<i64>>(json!({"id": 1}), "plan list").unwrap_err();
        assert!(err.to_string().contains("plan list"));
    }
}
