use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use acctsvc_core::AppError;

/// Uniform success envelope: `{"success": true, "data": …}` at HTTP 200.
pub struct SuccessEnvelope<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for SuccessEnvelope<T> {
    fn into_response(self) -> Response {
        Json(json!({ "success": true, "data": self.0 })).into_response()
    }
}

/// Uniform error envelope: `{"success": false, "error": …}` with the
/// HTTP status drawn from the error's declared code.
pub struct ErrorEnvelope {
    status: StatusCode,
    body: Value,
}

impl ErrorEnvelope {
    /// Wraps a structured application error.
    ///
    /// The serialized error never contains the wrapped cause. When
    /// `include_cause` is set (development only) the stringified cause is
    /// added next to it.
    pub fn from_app_error(err: &AppError, include_cause: bool) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut error = serde_json::to_value(err).unwrap_or_else(|_| {
            json!({ "code": err.status_code(), "message": err.message() })
        });
        if include_cause {
            if let (Some(source), Value::Object(fields)) = (err.source(), &mut error) {
                fields.insert("inner".to_string(), Value::String(source.to_string()));
            }
        }

        Self {
            status,
            body: json!({ "success": false, "error": error }),
        }
    }

    /// Fallback for failures that never became an [`AppError`], e.g. a
    /// request body that does not decode as JSON. Always a 400.
    pub fn unstructured(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "success": false,
                "status": 400,
                "error": {
                    "message": "An unexpected error occurred.",
                    "reason": reason.into(),
                },
            }),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        *response.status_mut() = self.status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_envelope_hides_the_cause_by_default() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "driver exploded");
        let err = AppError::internal_server("cannot create new account", "insert failed")
            .with_inner(cause);

        let envelope = ErrorEnvelope::from_app_error(&err, false);
        assert_eq!(envelope.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.body["success"], false);
        assert_eq!(envelope.body["error"]["message"], "cannot create new account");
        assert!(envelope.body["error"].get("inner").is_none());
    }

    #[test]
    fn development_envelope_exposes_the_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "driver exploded");
        let err = AppError::internal_server("cannot create new account", "insert failed")
            .with_inner(cause);

        let envelope = ErrorEnvelope::from_app_error(&err, true);
        assert_eq!(envelope.body["error"]["inner"], "driver exploded");
    }

    #[test]
    fn unstructured_failures_fall_back_to_bad_request() {
        let envelope = ErrorEnvelope::unstructured("body is not json");
        assert_eq!(envelope.status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope.body["success"], false);
        assert_eq!(envelope.body["status"], 400);
        assert_eq!(envelope.body["error"]["reason"], "body is not json");
    }
}
