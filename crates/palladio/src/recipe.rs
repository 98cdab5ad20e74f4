//! Route groups mounted under a common prefix.

use palladio_core::{Endpoint, Hook, Hooks};
use palladio_router::MethodSet;

/// A route waiting to be mounted.
#[derive(Debug)]
pub(crate) struct RecipeRoute {
    pub(crate) pattern: String,
    pub(crate) endpoint: Endpoint,
    pub(crate) methods: Option<MethodSet>,
    pub(crate) name: Option<String>,
}

/// A named group of routes sharing a path prefix and hooks.
///
/// Mounted with [`App::recipe`](crate::App::recipe). The prefix defaults to
/// `/` followed by the recipe name, and route names are namespaced as
/// `"{recipe}:{name}"`.
///
/// ```rust
/// use palladio::prelude::*;
///
/// # fn main() -> Result<(), AppError> {
/// let show = Endpoint::function(handler_fn(|_req, _res, _params| Box::pin(async move { Ok(()) })));
///
/// let blog = Recipe::new("blog").add_route("/posts/{slug}", show, None, Some("post"));
///
/// let mut app = App::new();
/// app.recipe(blog)?;
///
/// let params: Params = [("slug", "hello")].into_iter().collect();
/// assert_eq!(app.url_for("blog:post", &params)?, "/blog/posts/hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Recipe {
    name: String,
    prefix: String,
    hooks: Hooks,
    routes: Vec<RecipeRoute>,
}

impl Recipe {
    /// Creates an empty recipe mounted at `/{name}`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            prefix: format!("/{name}"),
            name,
            hooks: Hooks::new(),
            routes: Vec::new(),
        }
    }

    /// Mounts the recipe somewhere else. An empty prefix or `/` mounts at the
    /// root.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The recipe name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mount prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Adds a before-hook to every route of the recipe.
    pub fn before(mut self, hook: Hook) -> Self {
        self.hooks.push_before(hook);
        self
    }

    /// Adds an after-hook to every route of the recipe.
    pub fn after(mut self, hook: Hook) -> Self {
        self.hooks.push_after(hook);
        self
    }

    /// Adds a route. `pattern` is relative to the prefix.
    pub fn add_route(
        mut self,
        pattern: impl Into<String>,
        endpoint: Endpoint,
        methods: Option<MethodSet>,
        name: Option<&str>,
    ) -> Self {
        self.routes.push(RecipeRoute {
            pattern: pattern.into(),
            endpoint,
            methods,
            name: name.map(str::to_string),
        });
        self
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the recipe has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, String, Hooks, Vec<RecipeRoute>) {
        (self.name, self.prefix, self.hooks, self.routes)
    }
}
