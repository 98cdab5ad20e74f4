//! Typed, layered configuration for Palladio.
//!
//! Configuration is resolved in layers: built-in defaults, then a TOML or
//! JSON file, then environment variables of the form
//! `PALLADIO__SECTION__KEY`. The result is validated before it is returned.
//!
//! ```toml
//! [validation]
//! default_backend = "jsonschema"
//! cache_compiled = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_target = true
//! ```
//!
//! # Example
//!
//! ```
//! use palladio_config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_string("[validation]\ndefault_backend = \"jsonschema_draft7\"", "toml")
//!     .unwrap()
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.validation.default_backend, "jsonschema_draft7");
//! ```

mod config;
mod error;
mod loader;

pub use config::{LoggingConfig, PalladioConfig, ValidationConfig};
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use palladio_telemetry::LogFormat;
