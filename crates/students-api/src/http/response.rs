//! Response codec: the JSON error envelope and status-code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use students_storage::StorageError;

use crate::validation::FieldViolation;

/// Envelope status for non-error responses that carry no domain payload.
pub const STATUS_OK: &str = "OK";
/// Envelope status for error responses.
pub const STATUS_ERROR: &str = "Error";

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

/// An API failure: an HTTP status code plus the envelope message.
///
/// Success values are serialized raw (no envelope); only failures go
/// through this type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a 400 general error (malformed body, bad path id).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Creates a 400 validation error listing every violated field.
    pub fn validation(violations: &[FieldViolation]) -> Self {
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    /// Creates a 500 general error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                status: STATUS_ERROR,
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Missing records deliberately stay on the generic 500 path;
        // the API contract does not distinguish not-found from other
        // storage failures. Clients see the underlying message.
        error!("storage error: {}", err);
        ApiError::internal(err.to_string())
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldViolation, Rule};

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = ApiError::bad_request("empty body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "Error");
        assert_eq!(json["error"], "empty body");
    }

    #[tokio::test]
    async fn test_validation_error_joins_all_fields() {
        let violations = [
            FieldViolation {
                field: "Name",
                rule: Rule::Required,
            },
            FieldViolation {
                field: "Email",
                rule: Rule::Email,
            },
        ];
        let response = ApiError::validation(&violations).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "field Name is a required field, field Email is not a valid email"
        );
    }

    #[test]
    fn test_not_found_maps_to_internal_error() {
        let err = ApiError::from(StorageError::StudentNotFound { id: 3 });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "no student found with id 3");
    }
}
