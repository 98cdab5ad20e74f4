//! Startup-time errors.

use palladio_config::ConfigError;
use palladio_router::{PatternError, RouteConfigError, RouteNotFoundError};
use palladio_telemetry::TelemetryError;
use palladio_validation::{SchemaError, UnknownValidationBackendError, ValidationSetupError};
use thiserror::Error;

/// Everything that can go wrong while building an [`App`](crate::App) or
/// generating a URL.
///
/// Per-request failures are [`PalladioError`](palladio_core::PalladioError)
/// instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// A route could not be registered.
    #[error(transparent)]
    Route(#[from] RouteConfigError),

    /// A pattern is malformed, or URL building failed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Reverse lookup of a route name failed.
    #[error(transparent)]
    RouteNotFound(#[from] RouteNotFoundError),

    /// A validation hook names a backend that is not registered.
    #[error(transparent)]
    UnknownBackend(#[from] UnknownValidationBackendError),

    /// A validation schema does not compile.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialised.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl From<ValidationSetupError> for AppError {
    fn from(err: ValidationSetupError) -> Self {
        match err {
            ValidationSetupError::UnknownBackend(e) => Self::UnknownBackend(e),
            ValidationSetupError::Schema(e) => Self::Schema(e),
        }
    }
}
