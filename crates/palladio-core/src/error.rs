//! Per-request error type for Palladio.
//!
//! Every failure that can happen while a request is being dispatched is a
//! [`PalladioError`]. The core never renders these itself: the transport
//! layer calls [`PalladioError::status_code`] and
//! [`PalladioError::to_envelope`] and writes whatever it likes.
//!
//! Registration-time failures (bad patterns, unknown backends, malformed
//! schemas) are separate types in the crates that raise them.

use http::{Method, StatusCode};
use palladio_router::{MethodSet, RouteNotFoundError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`PalladioError`].
pub type PalladioResult<T> = Result<T, PalladioError>;

/// Non-standard status used for requests the client abandoned.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The body did not satisfy the route's schema.
    Validation,
    /// The request could not be decoded.
    BadRequest,
    /// No route, or no named route.
    NotFound,
    /// The path exists but not for this method.
    MethodNotAllowed,
    /// The request was cancelled before it completed.
    Cancelled,
    /// A handler or hook failed unexpectedly.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Cancelled => {
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard per-request error type for Palladio.
///
/// # Example
///
/// ```
/// use palladio_core::{ErrorCategory, PalladioError};
/// use http::StatusCode;
///
/// let error = PalladioError::validation(vec![
///     "\"price\" is a required property".to_string(),
///     "\"name\" is a required property".to_string(),
/// ]);
///
/// assert_eq!(error.category(), ErrorCategory::Validation);
/// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(error.validation_messages().map(<[String]>::len), Some(2));
/// ```
#[derive(Error, Debug)]
pub enum PalladioError {
    /// The request body failed schema validation.
    #[error("Validation failed with {} error(s)", messages.len())]
    Validation {
        /// One message per violation.
        messages: Vec<String>,
    },

    /// The request body could not be decoded.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// Nothing matched.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The route exists but does not accept this method.
    #[error("Method {method} not allowed (allowed: {allowed})")]
    MethodNotAllowed {
        /// The rejected method.
        method: Method,
        /// What the route does accept.
        allowed: MethodSet,
    },

    /// The request was cancelled mid-flight.
    #[error("Request cancelled")]
    Cancelled,

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl PalladioError {
    /// Creates a validation error carrying every violation message.
    #[must_use]
    pub fn validation(messages: Vec<String>) -> Self {
        Self::Validation { messages }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(method: Method, allowed: MethodSet) -> Self {
        Self::MethodNotAllowed { method, allowed }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the violation messages of a validation error.
    #[must_use]
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Self::Validation { messages } => Some(messages),
            _ => None,
        }
    }

    /// Returns true if this error came from cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Cancelled => "CANCELLED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation { messages } => Some(serde_json::json!({ "errors": messages })),
            Self::MethodNotAllowed { allowed, .. } => {
                let allowed: Vec<String> = allowed.iter().map(|m| m.to_string()).collect();
                Some(serde_json::json!({ "allowed": allowed }))
            }
            _ => None,
        }
    }
}

impl From<RouteNotFoundError> for PalladioError {
    fn from(err: RouteNotFoundError) -> Self {
        Self::not_found(err.to_string())
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = PalladioError::validation(vec!["'price' is a required property".into()]);
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Validation failed with 1 error(s)");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PalladioError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PalladioError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PalladioError::method_not_allowed(Method::POST, MethodSet::empty()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(PalladioError::Cancelled.status_code().as_u16(), 499);
        assert_eq!(
            PalladioError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_envelope_lists_every_message() {
        let error = PalladioError::validation(vec!["a".into(), "b".into()]);
        let envelope = error.to_envelope(Some("req-1"));

        assert_eq!(envelope.error.code, "VALIDATION_ERROR");
        assert_eq!(envelope.request_id.as_deref(), Some("req-1"));
        assert_eq!(
            envelope.error.details,
            Some(serde_json::json!({ "errors": ["a", "b"] }))
        );
    }

    #[test]
    fn test_method_not_allowed_envelope() {
        let allowed = MethodSet::empty().with(&Method::GET).with(&Method::PUT);
        let error = PalladioError::method_not_allowed(Method::DELETE, allowed);

        assert_eq!(
            error.to_string(),
            "Method DELETE not allowed (allowed: GET, PUT)"
        );
        let json = serde_json::to_value(error.to_envelope(None)).unwrap();
        assert_eq!(json["error"]["category"], "method_not_allowed");
        assert_eq!(json["error"]["details"]["allowed"], serde_json::json!(["GET", "PUT"]));
        assert!(json.get("request_id").is_none());
    }

    #[test]
    fn test_internal_with_source() {
        let error = PalladioError::internal_with_source("db down", anyhow::anyhow!("timeout"));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_envelope(None).error.details.is_none());
    }

    #[test]
    fn test_from_route_not_found() {
        let error: PalladioError = RouteNotFoundError::new("missing").into();
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert!(error.to_string().contains("missing"));
    }
}
