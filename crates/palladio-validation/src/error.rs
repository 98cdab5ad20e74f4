//! Validation error types.
//!
//! [`SchemaError`] and [`UnknownValidationBackendError`] are raised while a
//! validation hook is being built, before any request is served.
//! [`ValidationError`] is raised per request and becomes a 400.

use palladio_core::PalladioError;
use thiserror::Error;

/// A schema could not be compiled by its backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema for backend '{backend}': {message}")]
pub struct SchemaError {
    /// The backend that rejected the schema.
    pub backend: String,
    /// What the backend reported.
    pub message: String,
}

impl SchemaError {
    /// Creates a new schema error.
    #[must_use]
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

/// A document did not conform to a well-formed schema.
///
/// Carries one message per violation, never just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document failed validation with {} error(s)", messages.len())]
pub struct ValidationError {
    /// Violation messages in the order the backend reported them.
    pub messages: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error from its messages.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Creates a validation error with a single message.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl From<ValidationError> for PalladioError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.messages)
    }
}

/// No backend is registered under the resolved name.
///
/// An empty name means no name was given and no default has been set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation backend '{name}'")]
pub struct UnknownValidationBackendError {
    /// The name that failed to resolve.
    pub name: String,
}

impl UnknownValidationBackendError {
    /// Creates a new error for the given backend name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Anything that can go wrong while building a validation hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationSetupError {
    /// The backend name did not resolve.
    #[error(transparent)]
    UnknownBackend(#[from] UnknownValidationBackendError),

    /// The backend rejected the schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
