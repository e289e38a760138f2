//! Classification of HTTP responses into payloads or typed errors.

use serde_json::Value;

use crate::error::{ApiError, ErrorCause};
use crate::http::HttpResponse;

const GATEWAY_FALLBACK: &str = "Gateway Error";

/// Turn a response into its JSON payload or the matching [`ApiError`].
///
/// `None` stands for "no response was received" and always yields the
/// generic internal error. A success with an empty body resolves to `null`.
pub fn interpret(response: Option<&HttpResponse>) -> Result<Value, ApiError> {
    let Some(response) = response else {
        return Err(ApiError::internal());
    };

    if matches!(response.status, 200 | 201) {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body)
            .map_err(|e| ApiError::internal().caused_by(ErrorCause::Decode(e)));
    }

    let errors = error_details(&response.body);
    let status_text = response.status_text.clone();
    let err = match response.status {
        400 => ApiError::BadRequest {
            message: status_text,
            errors,
        },
        401 => ApiError::InvalidCredentials,
        404 => ApiError::NotFound { status_text },
        422 => ApiError::BadEntity {
            status_text,
            entity: errors,
        },
        409 => ApiError::RecordConflict {
            message: status_text,
            errors,
        },
        502 => ApiError::ServiceError {
            detail: match errors {
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => GATEWAY_FALLBACK.to_string(),
            },
        },
        _ => ApiError::internal(),
    };
    Err(err)
}

/// The `errors` field of an error body, if the body is JSON and has one.
fn error_details(body: &str) -> Option<Value> {
    let mut parsed: Value = serde_json::from_str(body).ok()?;
    match parsed.get_mut("errors").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(errors) => Some(errors),
    }
}
