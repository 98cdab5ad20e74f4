//! # Palladio
//!
//! The request-dispatch core of a micro web framework: a router that maps
//! `(method, path)` to a handler and typed path parameters, and a hook
//! pipeline with pluggable request-body validation.
//!
//! ```text
//! Request → match path ──miss──→ NotFound
//!              │
//!              ├─wrong method──→ MethodNotAllowed { allowed }
//!              ▼
//!   global before → route before (validation) → method before → handler
//!   → method after → route after → global after
//! ```
//!
//! Everything that can be misconfigured (patterns, duplicate routes, unknown
//! validation backends, malformed schemas) fails while the [`App`] is being
//! built. Per request, hooks and handlers raise a
//! [`PalladioError`](core::PalladioError); turning it into a response body is
//! left to the transport layer, using
//! [`PalladioError::to_envelope`](core::PalladioError::to_envelope).
//!
//! ## Crates
//!
//! | Re-export | Contents |
//! |-----------|----------|
//! | [`router`] | path patterns, method sets, generic route table |
//! | [`core`] | request/response, handlers, views, hooks, pipeline, errors |
//! | [`validation`] | validation backends, registry, validation hook |
//! | [`config`] | layered configuration |
//! | [`telemetry`] | logging setup |

mod app;
mod builder;
mod error;
mod recipe;

pub use app::App;
pub use builder::RouteBuilder;
pub use error::AppError;
pub use recipe::Recipe;

pub use palladio_config as config;
pub use palladio_core as core;
pub use palladio_router as router;
pub use palladio_telemetry as telemetry;
pub use palladio_validation as validation;

use palladio_config::PalladioConfig;

/// Installs the global log subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns [`AppError::Telemetry`] if the level is invalid or a subscriber
/// is already installed.
pub fn init_logging(config: &PalladioConfig) -> Result<(), AppError> {
    palladio_telemetry::init_logging(&config.logging.to_log_config())?;
    Ok(())
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{App, AppError, Recipe, RouteBuilder};

    pub use http::Method;

    pub use palladio_config::{ConfigLoader, PalladioConfig};
    pub use palladio_core::{
        handler_fn, Endpoint, Handler, Hook, PalladioError, PalladioResult, Request, Response,
        View,
    };
    pub use palladio_router::{MethodSet, ParamValue, Params};
    pub use palladio_validation::{BackendRegistry, ValidationBackend};
}
