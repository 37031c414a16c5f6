//! Client-facing error envelope.
//!
//! [`ApiError`] is the JSON body a service returns for a failed request. It
//! carries a machine code, a human message, the name of the service that
//! produced it, optional free-form context, an optional trace id and any
//! nested sub-errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON error body returned to API clients.
///
/// Empty fields are omitted when serialized.
///
/// # Example
///
/// ```rust
/// use tessera_core::ApiError;
///
/// let err = ApiError::new("WEB_INPUT_ERROR", "can not deserialize input request", "users")
///     .with_trace_id("4bf92f35");
///
/// let json = serde_json::to_value(&err).unwrap();
/// assert_eq!(json["code"], "WEB_INPUT_ERROR");
/// assert_eq!(json["traceId"], "4bf92f35");
/// assert!(json.get("errors").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Service that produced the error.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// Arbitrary additional data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    /// Trace id of the failed request.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace_id: String,

    /// Nested errors that caused this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
}

impl ApiError {
    /// Creates an error attributed to `target`.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    /// Creates an error with only a code and message.
    #[must_use]
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the target service. Empty values are ignored.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !target.is_empty() {
            self.target = target;
        }
        self
    }

    /// Replaces the code. Empty values are ignored.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !code.is_empty() {
            self.code = code;
        }
        self
    }

    /// Sets the trace id. Empty values are ignored.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        if !trace_id.is_empty() {
            self.trace_id = trace_id;
        }
        self
    }

    /// Attaches free-form context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<serde_json::Value>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Appends a nested error.
    pub fn push_error(&mut self, error: ApiError) {
        self.errors.push(error);
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Err: {} {}", self.code, self.message)?;
        if !self.target.is_empty() {
            write!(f, " Service: {}", self.target)?;
        }
        if !self.trace_id.is_empty() {
            write!(f, " TraceID: {}", self.trace_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
