//! Decorator-style route registration.

use http::Method;
use palladio_core::{Endpoint, Handler, Hook, Hooks, View};
use palladio_router::{MethodSet, Route};
use serde_json::Value;
use std::sync::Arc;

use crate::app::App;
use crate::error::AppError;

/// Collects a route's settings, then registers it when given a handler.
///
/// Created by [`App::route`]. Hooks, including validation hooks, run in the
/// order they are added. The `*_for` variants attach a hook to one method
/// only, which is how a view validates its `post` body but not its `get`.
///
/// # Example
///
/// ```rust
/// use palladio::prelude::*;
/// use serde_json::json;
///
/// # fn main() -> Result<(), AppError> {
/// let mut app = App::new();
/// let route = app
///     .route("/items")
///     .methods(["post", "put"])
///     .name("items")
///     .validate(&json!({ "required": ["price"] }), None)?
///     .handle(handler_fn(|_req, _res, _params| Box::pin(async move { Ok(()) })))?;
///
/// assert_eq!(route.methods().len(), 2);
/// assert_eq!(route.target().hooks().before().len(), 1);
/// # Ok(())
/// # }
/// ```
#[must_use = "a route is only registered by `handle` or `view`"]
pub struct RouteBuilder<'app> {
    app: &'app mut App,
    pattern: String,
    methods: Option<Vec<String>>,
    name: Option<String>,
    hooks: Hooks,
    method_before: Vec<(Method, Hook)>,
    method_after: Vec<(Method, Hook)>,
}

impl<'app> RouteBuilder<'app> {
    pub(crate) fn new(app: &'app mut App, pattern: String) -> Self {
        Self {
            app,
            pattern,
            methods: None,
            name: None,
            hooks: Hooks::new(),
            method_before: Vec::new(),
            method_after: Vec::new(),
        }
    }

    /// Restricts the route to these methods. Names are case-insensitive.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = Some(
            methods
                .into_iter()
                .map(|m| m.as_ref().trim().to_ascii_uppercase())
                .collect(),
        );
        self
    }

    /// Names the route for reverse lookup.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a before-hook.
    pub fn before(mut self, hook: Hook) -> Self {
        self.hooks.push_before(hook);
        self
    }

    /// Adds an after-hook.
    pub fn after(mut self, hook: Hook) -> Self {
        self.hooks.push_after(hook);
        self
    }

    /// Adds a validation before-hook for the request body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownBackend`] or [`AppError::Schema`]
    /// immediately, before the route exists.
    pub fn validate(mut self, schema: &Value, backend: Option<&str>) -> Result<Self, AppError> {
        let hook = self.app.validation_hook(schema, backend)?;
        self.hooks.push_before(hook);
        Ok(self)
    }

    /// Adds a before-hook that runs only for `method`.
    pub fn before_for(mut self, method: Method, hook: Hook) -> Self {
        self.method_before.push((method, hook));
        self
    }

    /// Adds an after-hook that runs only for `method`.
    pub fn after_for(mut self, method: Method, hook: Hook) -> Self {
        self.method_after.push((method, hook));
        self
    }

    /// Adds a validation before-hook that runs only for `method`.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn validate_for(
        mut self,
        method: Method,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<Self, AppError> {
        let hook = self.app.validation_hook(schema, backend)?;
        self.method_before.push((method, hook));
        Ok(self)
    }

    /// Registers the route with a function handler.
    ///
    /// # Errors
    ///
    /// See [`App::add_route`]; also [`AppError::Route`] for an unknown
    /// method name.
    pub fn handle(self, handler: Arc<dyn Handler>) -> Result<&'app mut Route<Endpoint>, AppError> {
        self.finish(Endpoint::function(handler))
    }

    /// Registers the route with a per-method view.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn view(self, view: View) -> Result<&'app mut Route<Endpoint>, AppError> {
        self.finish(Endpoint::view(view))
    }

    fn finish(self, mut endpoint: Endpoint) -> Result<&'app mut Route<Endpoint>, AppError> {
        let Self {
            app,
            pattern,
            methods,
            name,
            hooks,
            method_before,
            method_after,
        } = self;

        let methods = methods.map(MethodSet::parse).transpose()?;
        *endpoint.hooks_mut() = hooks;
        for (method, hook) in method_before {
            endpoint.method_hooks_mut(method).push_before(hook);
        }
        for (method, hook) in method_after {
            endpoint.method_hooks_mut(method).push_after(hook);
        }
        app.add_route(&pattern, endpoint, methods, name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palladio_core::handler_fn;
    use palladio_router::RouteConfigError;
    use serde_json::json;

    fn noop() -> Arc<dyn Handler> {
        handler_fn(|_req, _res, _params| Box::pin(async move { Ok(()) }))
    }

    #[test]
    fn test_methods_normalised() {
        let mut app = App::new();
        let route = app
            .route("/a")
            .methods([" get", "Post"])
            .handle(noop())
            .unwrap();
        assert!(route.allows(&Method::GET));
        assert!(route.allows(&Method::POST));
        assert!(!route.allows(&Method::PUT));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let mut app = App::new();
        let err = app.route("/a").methods(["FETCH"]).handle(noop()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Route(RouteConfigError::UnknownMethod { .. })
        ));
        assert!(app.router().is_empty());
    }

    #[test]
    fn test_empty_methods_rejected() {
        let mut app = App::new();
        let err = app
            .route("/a")
            .methods(Vec::<&str>::new())
            .handle(noop())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Route(RouteConfigError::EmptyMethods { .. })
        ));
    }

    #[test]
    fn test_bad_schema_fails_before_registration() {
        let mut app = App::new();
        let result = app
            .route("/a")
            .validate(&json!({ "properties": "fjkh" }), None);
        assert!(matches!(result, Err(AppError::Schema(_))));
        assert!(app.router().is_empty());
    }

    #[test]
    fn test_hooks_kept_in_order() {
        let mut app = App::new();
        let route = app
            .route("/a")
            .before(noop())
            .validate(&json!({}), Some("jsonschema_draft7"))
            .unwrap()
            .after(noop())
            .handle(noop())
            .unwrap();

        let hooks = route.target().hooks();
        assert_eq!(hooks.before().len(), 2);
        assert_eq!(hooks.after().len(), 1);
    }

    #[test]
    fn test_view_methods_come_from_view() {
        let mut app = App::new();
        let route = app
            .route("/v")
            .view(View::new().get(noop()).delete(noop()))
            .unwrap();
        assert_eq!(route.methods().len(), 2);
        assert!(route.allows(&Method::DELETE));
    }

    #[test]
    fn test_method_hooks_attached_to_their_method() {
        let mut app = App::new();
        let route = app
            .route("/items")
            .validate_for(Method::POST, &json!({ "required": ["price"] }), None)
            .unwrap()
            .after_for(Method::POST, noop())
            .before_for(Method::GET, noop())
            .view(View::new().get(noop()).post(noop()))
            .unwrap();

        let endpoint = route.target();
        assert!(endpoint.hooks().is_empty());
        let post = endpoint.method_hooks(&Method::POST).unwrap();
        assert_eq!((post.before().len(), post.after().len()), (1, 1));
        let get = endpoint.method_hooks(&Method::GET).unwrap();
        assert_eq!((get.before().len(), get.after().len()), (1, 0));
    }
}
