//! Handler trait for request processing.
//!
//! Handlers and hooks share one signature: they borrow the request, mutate
//! the response, read the path parameters and either succeed or raise a
//! [`PalladioError`](crate::PalladioError).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use palladio_router::Params;

use crate::error::PalladioResult;
use crate::request::Request;
use crate::response::Response;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A before/after hook. Hooks are plain handlers.
pub type Hook = Arc<dyn Handler>;

/// Anything that can process a request.
///
/// Implement this directly for stateful handlers, or wrap a closure with
/// [`handler_fn`].
///
/// # Example
///
/// ```rust
/// use palladio_core::{BoxFuture, Handler, PalladioResult, Request, Response};
/// use palladio_router::Params;
///
/// struct Greeter {
///     greeting: String,
/// }
///
/// impl Handler for Greeter {
///     fn call<'a>(
///         &'a self,
///         _req: &'a Request,
///         res: &'a mut Response,
///         params: &'a Params,
///     ) -> BoxFuture<'a, PalladioResult<()>> {
///         Box::pin(async move {
///             let name = params.get_str("name").unwrap_or("world");
///             res.text(format!("{}, {name}!", self.greeting));
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Processes the request, writing into `res`.
    fn call<'a>(
        &'a self,
        req: &'a Request,
        res: &'a mut Response,
        params: &'a Params,
    ) -> BoxFuture<'a, PalladioResult<()>>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call<'a>(
        &'a self,
        req: &'a Request,
        res: &'a mut Response,
        params: &'a Params,
    ) -> BoxFuture<'a, PalladioResult<()>> {
        (**self).call(req, res, params)
    }
}

/// A closure-based handler.
///
/// Created by [`handler_fn`].
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Wraps a closure.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Response, &'a Params) -> BoxFuture<'a, PalladioResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a Request,
        res: &'a mut Response,
        params: &'a Params,
    ) -> BoxFuture<'a, PalladioResult<()>> {
        (self.func)(req, res, params)
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Wraps a closure as a shareable handler or hook.
///
/// The closure returns a boxed future so it may borrow its arguments.
///
/// # Example
///
/// ```rust
/// use palladio_core::handler_fn;
///
/// let hello = handler_fn(|_req, res, _params| {
///     Box::pin(async move {
///         res.text("hello");
///         Ok(())
///     })
/// });
/// ```
pub fn handler_fn<F>(func: F) -> Arc<FnHandler<F>>
where
    F: for<'a> Fn(&'a Request, &'a mut Response, &'a Params) -> BoxFuture<'a, PalladioResult<()>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnHandler::new(func))
}
