//! Logging setup for Palladio applications.
//!
//! The framework crates only emit `tracing` events; this crate installs the
//! subscriber that turns them into output. Call [`init_logging`] once at
//! process start.
//!
//! | Level | Emitted for |
//! |-------|-------------|
//! | `debug` | route registration, matching, hook pipeline, validator cache hits |
//! | `info` | backend registration, default backend changes |
//! | `warn` | request bodies that fail validation |

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
