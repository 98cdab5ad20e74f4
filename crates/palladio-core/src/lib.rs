//! Core types for the Palladio request-dispatch framework.
//!
//! This crate defines what sits behind a route and how a request travels
//! through it:
//!
//! - [`Request`] / [`Response`]: the values hooks and handlers operate on
//! - [`Handler`]: the one signature shared by handlers and hooks
//! - [`View`]: per-method handler objects with an optional catch-all
//! - [`Endpoint`]: a handler plus the route's hooks, used as the router target
//! - [`Pipeline`]: global and route hooks around the handler, in order
//! - [`PalladioError`]: every per-request failure, with status mapping
//!
//! # Example
//!
//! ```rust
//! use palladio_core::{handler_fn, Endpoint, Hooks, Pipeline, Request, Response};
//! use palladio_router::Params;
//!
//! # tokio_test::block_on(async {
//! let endpoint = Endpoint::function(handler_fn(|_req, res, _params| {
//!     Box::pin(async move {
//!         res.text("hello");
//!         Ok(())
//!     })
//! }));
//!
//! let global = Hooks::new();
//! let mut res = Response::new();
//! Pipeline::new(&global, &endpoint)
//!     .run(&Request::default(), &mut res, &Params::new())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(res.body(), "hello");
//! # });
//! ```

mod endpoint;
mod error;
mod handler;
mod pipeline;
mod request;
mod response;
mod view;

pub use endpoint::{Endpoint, HandlerKind, Hooks};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, PalladioError, PalladioResult};
pub use handler::{handler_fn, BoxFuture, FnHandler, Handler, Hook};
pub use pipeline::Pipeline;
pub use request::{empty_body, BoxError, Request};
pub use response::Response;
pub use view::View;
