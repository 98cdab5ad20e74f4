//! The application: router, validation backends, global hooks and dispatch.

use std::sync::Arc;

use http::Method;
use palladio_config::PalladioConfig;
use palladio_core::{Endpoint, Hook, Hooks, PalladioError, PalladioResult, Pipeline, Request, Response};
use palladio_router::{MethodSet, Params, PathPattern, Route, RouteNotFoundError, Router};
use palladio_telemetry::fields;
use palladio_validation::{BackendRegistry, ValidationBackend, ValidationHook};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::builder::RouteBuilder;
use crate::error::AppError;
use crate::recipe::Recipe;

/// A Palladio application.
///
/// Built with `&mut self` registration calls, then shared as `Arc<App>` and
/// dispatched with `&self`. Nothing can be registered once dispatch has
/// started, because dispatch needs a shared borrow.
///
/// # Example
///
/// ```rust
/// use palladio::prelude::*;
/// use http::{Method, Uri};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), AppError> {
/// let mut app = App::new();
/// app.route("/items/{id:int}")
///     .name("item")
///     .handle(handler_fn(|_req, res, params| {
///         Box::pin(async move {
///             res.text(format!("item {}", params.get_int("id").unwrap_or_default()));
///             Ok(())
///         })
///     }))?;
///
/// let request = Request::new(Method::GET, Uri::from_static("/items/7"));
/// let response = app.dispatch(request, CancellationToken::new()).await.unwrap();
/// assert_eq!(response.body(), "item 7");
///
/// let params: Params = [("id", 8_i64)].into_iter().collect();
/// assert_eq!(app.url_for("item", &params)?, "/items/8");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct App {
    router: Router<Endpoint>,
    backends: BackendRegistry,
    hooks: Hooks,
}

impl App {
    /// Creates an application with the builtin validation backends.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an application and applies `config`.
    #[must_use]
    pub fn from_config(config: &PalladioConfig) -> Self {
        let mut app = Self::new();
        app.apply_config(config);
        app
    }

    /// Applies the validation section of `config`.
    ///
    /// The default backend name is not checked until a hook is built.
    pub fn apply_config(&mut self, config: &PalladioConfig) {
        self.backends
            .set_default_backend(config.validation.default_backend.clone());
        self.backends
            .set_cache_enabled(config.validation.cache_compiled);
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router<Endpoint> {
        &self.router
    }

    /// The validation backends.
    #[must_use]
    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// Mutable access to the validation backends.
    pub fn backends_mut(&mut self) -> &mut BackendRegistry {
        &mut self.backends
    }

    /// Hooks that run around every route.
    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    // -- registration ------------------------------------------------------

    /// Registers a route.
    ///
    /// `methods` of `None` lets the endpoint decide: every method for a
    /// function handler, the implemented methods for a [`View`](palladio_core::View).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Route`] on a duplicate pattern or name, a
    /// malformed pattern, or an empty method set.
    pub fn add_route(
        &mut self,
        pattern: &str,
        endpoint: Endpoint,
        methods: Option<MethodSet>,
        name: Option<&str>,
    ) -> Result<&mut Route<Endpoint>, AppError> {
        Ok(self.router.add_route(pattern, endpoint, methods, name)?)
    }

    /// Starts a decorator-style route registration.
    pub fn route(&mut self, pattern: impl Into<String>) -> RouteBuilder<'_> {
        RouteBuilder::new(self, pattern.into())
    }

    /// Adds a hook that runs before every route's own before-hooks.
    pub fn before(&mut self, hook: Hook) -> &mut Self {
        self.hooks.push_before(hook);
        self
    }

    /// Adds a hook that runs after every route's own after-hooks.
    pub fn after(&mut self, hook: Hook) -> &mut Self {
        self.hooks.push_after(hook);
        self
    }

    /// Mounts every route of a recipe under its prefix.
    ///
    /// Route names become `"{recipe}:{name}"` and the recipe's hooks are
    /// appended to each route's own. Routes mounted before a failing one
    /// stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first [`AppError`] raised while mounting.
    pub fn recipe(&mut self, recipe: Recipe) -> Result<&mut Self, AppError> {
        let (recipe_name, prefix, hooks, routes) = recipe.into_parts();

        for mut route in routes {
            let pattern = PathPattern::compile(&route.pattern)?.prefixed(&prefix)?;
            let name = route.name.map(|n| format!("{recipe_name}:{n}"));
            route.endpoint.hooks_mut().extend(&hooks);
            self.router.add_route(
                pattern.as_str(),
                route.endpoint,
                route.methods,
                name.as_deref(),
            )?;
        }

        debug!(recipe = %recipe_name, prefix = %prefix, "recipe mounted");
        Ok(self)
    }

    // -- validation --------------------------------------------------------

    /// Registers a validation backend, optionally as the new default.
    pub fn register_backend(
        &mut self,
        name: impl Into<String>,
        backend: impl ValidationBackend,
        set_as_default: bool,
    ) -> &mut Self {
        self.backends.register_backend(name, backend, set_as_default);
        self
    }

    /// Sets the default validation backend by name.
    pub fn set_default_backend(&mut self, name: impl Into<String>) -> &mut Self {
        self.backends.set_default_backend(name);
        self
    }

    /// Name of the default validation backend.
    #[must_use]
    pub fn default_backend_name(&self) -> Option<&str> {
        self.backends.default_backend_name()
    }

    /// Builds a validation before-hook.
    ///
    /// `backend` of `None` uses the default backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownBackend`] or [`AppError::Schema`]; both
    /// are raised here and never deferred to request time.
    pub fn validation_hook(
        &self,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<Hook, AppError> {
        let hook: ValidationHook = self.backends.build_validation_hook(schema, backend)?;
        Ok(Arc::new(hook))
    }

    /// Attaches a validation hook to a named route, after its existing
    /// before-hooks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RouteNotFound`] for an unknown route name, or any
    /// error of [`validation_hook`](Self::validation_hook).
    pub fn validate(
        &mut self,
        route_name: &str,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<&mut Self, AppError> {
        let hook = self.validation_hook(schema, backend)?;
        let route = self
            .router
            .get_mut(route_name)
            .ok_or_else(|| RouteNotFoundError::new(route_name))?;
        route.target_mut().hooks_mut().push_before(hook);
        Ok(self)
    }

    /// Attaches a validation hook to one method of a named route.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn validate_method(
        &mut self,
        route_name: &str,
        method: Method,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<&mut Self, AppError> {
        let hook = self.validation_hook(schema, backend)?;
        let route = self
            .router
            .get_mut(route_name)
            .ok_or_else(|| RouteNotFoundError::new(route_name))?;
        route.target_mut().method_hooks_mut(method).push_before(hook);
        Ok(self)
    }

    // -- lookup ------------------------------------------------------------

    /// Looks up a route by name.
    ///
    /// # Errors
    ///
    /// Returns [`RouteNotFoundError`] if no route has that name.
    pub fn get_route_or_404(&self, name: &str) -> Result<&Route<Endpoint>, RouteNotFoundError> {
        self.router.get_route_or_404(name)
    }

    /// Builds the path of a named route.
    ///
    /// Missing parameters fall back to their declared defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RouteNotFound`] for an unknown name and
    /// [`AppError::Pattern`] for a missing or invalid parameter.
    pub fn url_for(&self, name: &str, params: &Params) -> Result<String, AppError> {
        Ok(self.router.get_route_or_404(name)?.url(params)?)
    }

    // -- dispatch ----------------------------------------------------------

    /// Dispatches a request.
    ///
    /// Matching failures come back as [`PalladioError::NotFound`] and
    /// [`PalladioError::MethodNotAllowed`]. Cancelling `cancel` drops the
    /// pipeline wherever it is suspended and yields
    /// [`PalladioError::Cancelled`]; nothing after that point runs.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by matching, a hook or the handler.
    pub async fn dispatch(
        &self,
        request: Request,
        cancel: CancellationToken,
    ) -> PalladioResult<Response> {
        let request_id = Uuid::now_v7();
        let span = info_span!(
            "dispatch",
            { fields::REQUEST_ID } = %request_id,
            { fields::HTTP_METHOD } = %request.method(),
            { fields::HTTP_PATH } = %request.path(),
        );

        async {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("request cancelled");
                    Err(PalladioError::Cancelled)
                }
                result = self.handle(&request) => {
                    match &result {
                        Ok(response) => debug!(
                            { fields::HTTP_STATUS } = response.status().as_u16(),
                            "request handled"
                        ),
                        Err(err) => debug!(
                            { fields::HTTP_STATUS } = err.status_code().as_u16(),
                            { fields::ERROR } = %err,
                            "request failed"
                        ),
                    }
                    result
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Dispatches a request that cannot be cancelled.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn dispatch_uncancellable(&self, request: Request) -> PalladioResult<Response> {
        self.dispatch(request, CancellationToken::new()).await
    }

    async fn handle(&self, request: &Request) -> PalladioResult<Response> {
        let matched = self.router.match_path(request.path()).ok_or_else(|| {
            PalladioError::not_found(format!("no route matches '{}'", request.path()))
        })?;
        let route = matched.route;

        if !route.allows(request.method()) {
            return Err(PalladioError::method_not_allowed(
                request.method().clone(),
                route.methods(),
            ));
        }

        debug!({ fields::ROUTE } = %route.pattern(), "route matched");

        let mut response = Response::new();
        Pipeline::new(&self.hooks, route.target())
            .run(request, &mut response, &matched.params)
            .await?;
        Ok(response)
    }
}
