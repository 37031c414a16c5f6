//! Error responses for failed bindings.
//!
//! The binder only reports errors; the HTTP layer decides when to write them.
//! [`ErrorResponse`] turns a [`BindError`] into the JSON envelope clients
//! receive, with the error's status code.
//!
//! # Example
//!
//! ```rust
//! use tessera_bind::{response::error_response, BindError};
//! use http::StatusCode;
//!
//! let response = error_response(&BindError::missing("user_id"), "users-service");
//!
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//! let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
//! assert_eq!(body["code"], "WEB_INPUT_ERROR");
//! assert_eq!(body["errors"][0]["code"], "MISSING_PARAMETER");
//! ```

use crate::BindError;
use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use tessera_core::ApiError;

/// Body written when the envelope itself cannot be serialized.
const FALLBACK_BODY: &str = r#"{"code":"Internal Server Error","message":"unknown error"}"#;

/// JSON error response builder.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    status: StatusCode,
    envelope: ApiError,
}

impl ErrorResponse {
    /// Creates an error response for `err` on behalf of service `target`.
    #[must_use]
    pub fn new(err: &BindError, target: &str) -> Self {
        Self {
            status: err.status_code(),
            envelope: err.to_api_error(target),
        }
    }

    /// Attaches a trace id to the envelope. Empty ids are ignored.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: &str) -> Self {
        self.envelope = self.envelope.with_trace_id(trace_id);
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the envelope.
    #[must_use]
    pub fn envelope(&self) -> &ApiError {
        &self.envelope
    }

    /// Builds the HTTP response.
    ///
    /// If the envelope cannot be serialized the response degrades to a
    /// generic 500 body.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let (status, body) = match serde_json::to_vec(&self.envelope) {
            Ok(body) => (self.status, Bytes::from(body)),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize error envelope");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Bytes::from_static(FALLBACK_BODY.as_bytes()),
                )
            }
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

/// Builds the JSON error response for `err`.
#[must_use]
pub fn error_response(err: &BindError, target: &str) -> Response<Bytes> {
    ErrorResponse::new(err, target).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{WEB_INPUT_ERROR, WEB_INPUT_MESSAGE};

    #[test]
    fn test_error_response_status_and_content_type() {
        let response = error_response(&BindError::coercion("age", "x", "i32"), "svc");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_error_response_body() {
        let response = ErrorResponse::new(&BindError::missing("user_id"), "users-service")
            .with_trace_id("trace-1")
            .into_response();

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["code"], WEB_INPUT_ERROR);
        assert_eq!(body["message"], WEB_INPUT_MESSAGE);
        assert_eq!(body["target"], "users-service");
        assert_eq!(body["traceId"], "trace-1");
        assert_eq!(body["errors"][0]["code"], "MISSING_PARAMETER");
        assert_eq!(body["errors"][0]["context"], "user_id");
        assert_eq!(
            body["errors"][0]["message"],
            "request does not contain parameter 'user_id'"
        );
    }

    #[test]
    fn test_empty_trace_id_is_ignored() {
        let response = ErrorResponse::new(&BindError::body_decode("eof"), "svc").with_trace_id("");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.envelope().trace_id.is_empty());
    }
}
