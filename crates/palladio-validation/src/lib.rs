//! Pluggable request-body validation for Palladio.
//!
//! A [`ValidationBackend`] compiles a schema once into a
//! [`CompiledValidator`]; a [`BackendRegistry`] holds backends by name, keeps
//! a process-wide default and caches compiled validators. The registry's
//! [`build_validation_hook`](BackendRegistry::build_validation_hook) produces
//! a [`ValidationHook`], an ordinary before-hook.
//!
//! # Errors
//!
//! | When | Error |
//! |------|-------|
//! | hook construction, backend name unknown | [`UnknownValidationBackendError`] |
//! | hook construction, schema malformed | [`SchemaError`] |
//! | per request, body not JSON | `PalladioError::BadRequest` |
//! | per request, body does not conform | [`ValidationError`], as `PalladioError::Validation` |
//!
//! # Example
//!
//! ```rust
//! use palladio_validation::BackendRegistry;
//! use serde_json::json;
//!
//! let registry = BackendRegistry::new();
//!
//! // Fails now, not on the first request.
//! assert!(registry.build_validation_hook(&json!({ "properties": "oops" }), None).is_err());
//! assert!(registry.build_validation_hook(&json!({}), Some("nope")).is_err());
//!
//! let hook = registry
//!     .build_validation_hook(&json!({ "required": ["price"] }), None)
//!     .unwrap();
//! assert_eq!(hook.backend_name(), "jsonschema");
//! ```

mod backend;
mod error;
mod hook;
mod json_schema;
mod registry;

pub use backend::{CompiledValidator, ValidationBackend, Validator};
pub use error::{SchemaError, UnknownValidationBackendError, ValidationError, ValidationSetupError};
pub use hook::ValidationHook;
pub use json_schema::{JsonSchemaBackend, JSONSCHEMA, JSONSCHEMA_DRAFT7};
pub use registry::BackendRegistry;
