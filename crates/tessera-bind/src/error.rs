//! Binding errors.
//!
//! Every failure aborts the binding and is returned as a [`BindError`]. The
//! error names the parameter it concerns and maps onto an HTTP status and a
//! client error envelope; writing the response is left to the HTTP layer.

use http::StatusCode;
use tessera_core::ApiError;
use thiserror::Error;

/// Code used for the outer envelope of every binding failure.
pub const WEB_INPUT_ERROR: &str = "WEB_INPUT_ERROR";

/// Message used for the outer envelope of every binding failure.
pub const WEB_INPUT_MESSAGE: &str = "can not deserialize input request";

/// Classification of a [`BindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindErrorKind {
    /// The body was not valid JSON and no other source was declared.
    BodyDecode,
    /// No declared source supplied a tagged parameter.
    MissingValue,
    /// A tagged field cannot be written.
    UnassignableField,
    /// A tagged field has a type with no coercion rule.
    UnsupportedType,
    /// A value was found but could not be converted.
    Coercion,
}

/// Error returned when a request cannot be bound.
///
/// # Example
///
/// ```rust
/// use tessera_bind::{BindError, BindErrorKind};
/// use http::StatusCode;
///
/// let err = BindError::missing("user_id");
/// assert_eq!(err.kind(), BindErrorKind::MissingValue);
/// assert_eq!(err.param(), Some("user_id"));
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(err.to_string().contains("user_id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The body could not be decoded.
    #[error("failed to decode request body: {reason}")]
    BodyDecode {
        /// Decoder message.
        reason: String,
    },

    /// No source supplied the parameter.
    #[error("request does not contain parameter '{param}'")]
    MissingValue {
        /// Parameter name from the binding tag.
        param: String,
    },

    /// The field bound to the parameter is read-only.
    #[error("field bound to '{param}' cannot be assigned: {type_name} is read-only")]
    UnassignableField {
        /// Parameter name from the binding tag.
        param: String,
        /// Declared type of the field.
        type_name: &'static str,
    },

    /// The field bound to the parameter has no coercion rule.
    #[error("field bound to '{param}' has unsupported type {type_name}")]
    UnsupportedType {
        /// Parameter name from the binding tag.
        param: String,
        /// Declared type of the field.
        type_name: &'static str,
    },

    /// The value could not be converted to the field's type.
    #[error("invalid value for parameter '{param}': expected {expected}, got '{value}'")]
    Coercion {
        /// Parameter name from the binding tag.
        param: String,
        /// Raw value that failed to convert.
        value: String,
        /// Name of the expected type.
        expected: &'static str,
    },
}

impl BindError {
    /// Creates a body decode error.
    #[must_use]
    pub fn body_decode(reason: impl Into<String>) -> Self {
        Self::BodyDecode {
            reason: reason.into(),
        }
    }

    /// Creates a missing-value error.
    #[must_use]
    pub fn missing(param: impl Into<String>) -> Self {
        Self::MissingValue {
            param: param.into(),
        }
    }

    /// Creates an unassignable-field error.
    #[must_use]
    pub fn unassignable(param: impl Into<String>, type_name: &'static str) -> Self {
        Self::UnassignableField {
            param: param.into(),
            type_name,
        }
    }

    /// Creates an unsupported-type error.
    #[must_use]
    pub fn unsupported(param: impl Into<String>, type_name: &'static str) -> Self {
        Self::UnsupportedType {
            param: param.into(),
            type_name,
        }
    }

    /// Creates a coercion error.
    #[must_use]
    pub fn coercion(
        param: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::Coercion {
            param: param.into(),
            value: value.into(),
            expected,
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> BindErrorKind {
        match self {
            Self::BodyDecode { .. } => BindErrorKind::BodyDecode,
            Self::MissingValue { .. } => BindErrorKind::MissingValue,
            Self::UnassignableField { .. } => BindErrorKind::UnassignableField,
            Self::UnsupportedType { .. } => BindErrorKind::UnsupportedType,
            Self::Coercion { .. } => BindErrorKind::Coercion,
        }
    }

    /// Returns the parameter the error concerns. Body errors have none.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::BodyDecode { .. } => None,
            Self::MissingValue { param }
            | Self::UnassignableField { param, .. }
            | Self::UnsupportedType { param, .. }
            | Self::Coercion { param, .. } => Some(param.as_str()),
        }
    }

    /// Returns true for errors caused by the target declaration rather than
    /// the request.
    #[must_use]
    pub const fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::UnassignableField { .. } | Self::UnsupportedType { .. }
        )
    }

    /// Returns the HTTP status for the error response.
    ///
    /// Every binding failure is reported to the client as a bad request.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns the machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BodyDecode { .. } => "BODY_DECODE_FAILED",
            Self::MissingValue { .. } => "MISSING_PARAMETER",
            Self::UnassignableField { .. } => "UNASSIGNABLE_FIELD",
            Self::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            Self::Coercion { .. } => "INVALID_PARAMETER",
        }
    }

    /// Converts the error into the client envelope for service `target`.
    ///
    /// The outer error is the generic input error; the specific failure is
    /// attached as its single nested error.
    #[must_use]
    pub fn to_api_error(&self, target: &str) -> ApiError {
        let mut envelope = ApiError::new(WEB_INPUT_ERROR, WEB_INPUT_MESSAGE, target);
        let mut detail = ApiError::simple(self.error_code(), self.to_string());
        if let Some(param) = self.param() {
            detail = detail.with_context(param);
        }
        envelope.push_error(detail);
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_error() {
        let err = BindError::missing("user_id");

        assert_eq!(err.kind(), BindErrorKind::MissingValue);
        assert_eq!(err.param(), Some("user_id"));
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
        assert_eq!(
            err.to_string(),
            "request does not contain parameter 'user_id'"
        );
        assert!(!err.is_declaration_error());
    }

    #[test]
    fn test_body_decode_error_has_no_param() {
        let err = BindError::body_decode("expected value at line 1 column 1");

        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
        assert_eq!(err.param(), None);
        assert_eq!(err.error_code(), "BODY_DECODE_FAILED");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_coercion_error_reports_value_and_type() {
        let err = BindError::coercion("age", "thirty", "i32");

        assert_eq!(err.kind(), BindErrorKind::Coercion);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        let message = err.to_string();
        assert!(message.contains("age"));
        assert!(message.contains("thirty"));
        assert!(message.contains("i32"));
    }

    #[test]
    fn test_declaration_errors() {
        let unassignable = BindError::unassignable("name", "&str");
        let unsupported = BindError::unsupported("tags", "Vec<String>");

        assert!(unassignable.is_declaration_error());
        assert!(unsupported.is_declaration_error());
        assert_eq!(unassignable.error_code(), "UNASSIGNABLE_FIELD");
        assert_eq!(unsupported.error_code(), "UNSUPPORTED_TYPE");
        assert_eq!(unsupported.param(), Some("tags"));
    }

    #[test]
    fn test_every_kind_is_a_bad_request() {
        let errors = [
            BindError::body_decode("eof"),
            BindError::missing("a"),
            BindError::unassignable("b", "&str"),
            BindError::unsupported("c", "Vec<u8>"),
            BindError::coercion("d", "x", "bool"),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_api_error_envelope() {
        let err = BindError::missing("user_id");
        let envelope = err.to_api_error("users-service");

        assert_eq!(envelope.code, WEB_INPUT_ERROR);
        assert_eq!(envelope.message, WEB_INPUT_MESSAGE);
        assert_eq!(envelope.target, "users-service");
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, "MISSING_PARAMETER");
        assert_eq!(
            envelope.errors[0].context,
            Some(serde_json::Value::from("user_id"))
        );
    }

    #[test]
    fn test_api_error_envelope_for_body_error() {
        let envelope = BindError::body_decode("eof").to_api_error("svc");

        assert_eq!(envelope.errors[0].code, "BODY_DECODE_FAILED");
        assert_eq!(envelope.errors[0].context, None);
    }
}
