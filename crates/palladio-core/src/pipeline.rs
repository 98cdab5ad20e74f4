//! The per-request hook pipeline.
//!
//! ## Order
//!
//! 1. Global before-hooks
//! 2. Route before-hooks (a validation hook is one of these)
//! 3. Before-hooks registered for the request method only
//! 4. The handler selected for the request method
//! 5. After-hooks registered for the request method only
//! 6. Route after-hooks
//! 7. Global after-hooks
//!
//! The first error stops the pipeline. Nothing after it runs, after-hooks
//! included. Dropping the returned future has the same effect, which is how
//! cancellation short-circuits a request.

use http::Method;
use palladio_router::Params;
use tracing::{debug, trace};

use crate::endpoint::{Endpoint, Hooks};
use crate::error::PalladioResult;
use crate::handler::Hook;
use crate::request::Request;
use crate::response::Response;

/// One request's path through global hooks, route hooks and handler.
///
/// Borrowed from the application for the duration of a request; holds no
/// state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    global: &'a Hooks,
    endpoint: &'a Endpoint,
}

impl<'a> Pipeline<'a> {
    /// Assembles the pipeline for a matched route.
    #[must_use]
    pub const fn new(global: &'a Hooks, endpoint: &'a Endpoint) -> Self {
        Self { global, endpoint }
    }

    /// Number of hooks that will run before the handler for `method`.
    #[must_use]
    pub fn before_count(&self, method: &Method) -> usize {
        self.global.before().len()
            + self.endpoint.hooks().before().len()
            + self.method_before(method).len()
    }

    /// Number of hooks that will run after the handler for `method`.
    #[must_use]
    pub fn after_count(&self, method: &Method) -> usize {
        self.method_after(method).len()
            + self.endpoint.hooks().after().len()
            + self.global.after().len()
    }

    fn method_before(&self, method: &Method) -> &'a [Hook] {
        self.endpoint
            .method_hooks(method)
            .map(Hooks::before)
            .unwrap_or_default()
    }

    fn method_after(&self, method: &Method) -> &'a [Hook] {
        self.endpoint
            .method_hooks(method)
            .map(Hooks::after)
            .unwrap_or_default()
    }

    /// Runs the pipeline, mutating `res` in place.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a hook or the handler.
    pub async fn run(
        &self,
        req: &Request,
        res: &mut Response,
        params: &Params,
    ) -> PalladioResult<()> {
        let handler = self.endpoint.handler_for(req.method())?;

        debug!(
            before = self.before_count(req.method()),
            after = self.after_count(req.method()),
            "running hook pipeline"
        );

        let before = self
            .global
            .before()
            .iter()
            .chain(self.endpoint.hooks().before())
            .chain(self.method_before(req.method()));
        for (index, hook) in before.enumerate() {
            trace!(index, "before-hook");
            hook.call(req, res, params).await?;
        }

        handler.call(req, res, params).await?;

        let after = self
            .method_after(req.method())
            .iter()
            .chain(self.endpoint.hooks().after())
            .chain(self.global.after());
        for (index, hook) in after.enumerate() {
            trace!(index, "after-hook");
            hook.call(req, res, params).await?;
        }

        Ok(())
    }
}
