//! Per-method handler objects.
//!
//! A [`View`] groups one optional handler per HTTP method, plus an optional
//! catch-all. Its capabilities are fixed once it is registered: a view with
//! a catch-all serves every method, otherwise exactly the methods it has a
//! handler for.

use std::fmt;
use std::sync::Arc;

use http::Method;
use palladio_router::MethodSet;

use crate::handler::Handler;

/// Maps HTTP methods to handlers for a single route.
///
/// # Example
///
/// ```rust
/// use palladio_core::{handler_fn, View};
/// use http::Method;
///
/// let list = handler_fn(|_req, res, _params| Box::pin(async move {
///     res.text("[]");
///     Ok(())
/// }));
/// let create = handler_fn(|_req, res, _params| Box::pin(async move {
///     res.set_status(http::StatusCode::CREATED);
///     Ok(())
/// }));
///
/// let view = View::new().get(list).post(create);
///
/// assert!(view.handler_for(&Method::GET).is_some());
/// assert!(view.handler_for(&Method::DELETE).is_none());
/// assert_eq!(view.capabilities().to_string(), "GET, POST");
/// ```
#[derive(Clone, Default)]
pub struct View {
    /// GET handler
    get: Option<Arc<dyn Handler>>,
    /// HEAD handler
    head: Option<Arc<dyn Handler>>,
    /// POST handler
    post: Option<Arc<dyn Handler>>,
    /// PUT handler
    put: Option<Arc<dyn Handler>>,
    /// DELETE handler
    delete: Option<Arc<dyn Handler>>,
    /// CONNECT handler
    connect: Option<Arc<dyn Handler>>,
    /// OPTIONS handler
    options: Option<Arc<dyn Handler>>,
    /// TRACE handler
    trace: Option<Arc<dyn Handler>>,
    /// PATCH handler
    patch: Option<Arc<dyn Handler>>,
    /// Fallback for any method without its own handler
    handle: Option<Arc<dyn Handler>>,
}

impl View {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::GET, handler)
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::POST, handler)
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::PUT, handler)
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::DELETE, handler)
    }

    /// Registers a PATCH handler.
    #[must_use]
    pub fn patch(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::PATCH, handler)
    }

    /// Registers a HEAD handler.
    #[must_use]
    pub fn head(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::HEAD, handler)
    }

    /// Registers an OPTIONS handler.
    #[must_use]
    pub fn options(self, handler: Arc<dyn Handler>) -> Self {
        self.method(&Method::OPTIONS, handler)
    }

    /// Registers a catch-all handler. The view then serves every method.
    #[must_use]
    pub fn handle(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handle = Some(handler);
        self
    }

    /// Registers a handler for a specific method.
    ///
    /// Extension methods are ignored; they can only reach a catch-all.
    #[must_use]
    pub fn method(mut self, method: &Method, handler: Arc<dyn Handler>) -> Self {
        if let Some(slot) = self.slot_mut(method) {
            *slot = Some(handler);
        }
        self
    }

    fn slot(&self, method: &Method) -> Option<&Option<Arc<dyn Handler>>> {
        let slot = match *method {
            Method::GET => &self.get,
            Method::HEAD => &self.head,
            Method::POST => &self.post,
            Method::PUT => &self.put,
            Method::DELETE => &self.delete,
            Method::CONNECT => &self.connect,
            Method::OPTIONS => &self.options,
            Method::TRACE => &self.trace,
            Method::PATCH => &self.patch,
            _ => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<Arc<dyn Handler>>> {
        let slot = match *method {
            Method::GET => &mut self.get,
            Method::HEAD => &mut self.head,
            Method::POST => &mut self.post,
            Method::PUT => &mut self.put,
            Method::DELETE => &mut self.delete,
            Method::CONNECT => &mut self.connect,
            Method::OPTIONS => &mut self.options,
            Method::TRACE => &mut self.trace,
            Method::PATCH => &mut self.patch,
            _ => return None,
        };
        Some(slot)
    }

    /// Returns true if the view has a catch-all handler.
    #[must_use]
    pub fn has_catch_all(&self) -> bool {
        self.handle.is_some()
    }

    /// The methods this view can serve.
    #[must_use]
    pub fn capabilities(&self) -> MethodSet {
        if self.has_catch_all() {
            return MethodSet::all();
        }
        MethodSet::all()
            .iter()
            .filter(|m| self.slot(m).is_some_and(Option::is_some))
            .collect()
    }

    /// Returns the handler for `method`, falling back to the catch-all.
    #[must_use]
    pub fn handler_for(&self, method: &Method) -> Option<&Arc<dyn Handler>> {
        self.slot(method)
            .and_then(Option::as_ref)
            .or(self.handle.as_ref())
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("capabilities", &self.capabilities())
            .field("catch_all", &self.has_catch_all())
            .finish()
    }
}
