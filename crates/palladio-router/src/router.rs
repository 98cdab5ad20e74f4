//! The route table.
//!
//! Routes are kept in registration order and matched linearly. The first
//! pattern that accepts a path wins, so an earlier `/users/me` shadows a later
//! `/users/{id}` and not the other way round.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{RouteConfigError, RouteNotFoundError};
use crate::method::MethodSet;
use crate::pattern::PathPattern;
use crate::route::{Route, RouteTarget};
use crate::RouteMatch;

/// An insertion-ordered collection of routes.
///
/// `T` is whatever sits behind a route: a handler, an operation id, or `()`
/// in tests. Registration requires `&mut self` and matching only `&self`, so
/// a router that has been moved into an `Arc` can no longer change. Build it
/// completely before serving traffic.
///
/// # Example
///
/// ```rust
/// use palladio_router::Router;
///
/// let mut router = Router::new();
/// router.add_route("/users", "listUsers", None, Some("users")).unwrap();
/// router.add_route("/users/{id:int}", "getUser", None, None).unwrap();
///
/// let found = router.match_path("/users/42").unwrap();
/// assert_eq!(*found.route.target(), "getUser");
/// assert_eq!(found.params.get_int("id"), Some(42));
///
/// assert!(router.match_path("/teams").is_none());
/// assert_eq!(router.get_route_or_404("users").unwrap().pattern().as_str(), "/users");
/// ```
#[derive(Debug, Clone)]
pub struct Router<T> {
    /// Routes keyed by raw pattern string
    routes: IndexMap<String, Route<T>>,
    /// Route name to raw pattern string
    names: HashMap<String, String>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: IndexMap::new(),
            names: HashMap::new(),
        }
    }

    /// Matches a path against the registered routes in insertion order.
    ///
    /// Method applicability is not checked here. Callers compare the request
    /// method against [`Route::methods`] so they can tell "no such path" from
    /// "wrong method".
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        self.routes.values().find_map(|route| {
            route
                .pattern()
                .match_path(path)
                .map(|params| RouteMatch::new(route, params))
        })
    }

    /// Looks up a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route<T>> {
        self.names
            .get(name)
            .and_then(|pattern| self.routes.get(pattern))
    }

    /// Looks up a route by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Route<T>> {
        let pattern = self.names.get(name)?;
        self.routes.get_mut(pattern)
    }

    /// Looks up a route by name, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RouteNotFoundError`] when no route carries `name`.
    pub fn get_route_or_404(&self, name: &str) -> Result<&Route<T>, RouteNotFoundError> {
        self.get(name).ok_or_else(|| RouteNotFoundError::new(name))
    }

    /// Looks up a route by its raw pattern string.
    #[must_use]
    pub fn get_by_pattern(&self, pattern: &str) -> Option<&Route<T>> {
        self.routes.get(pattern)
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in match priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<T>> {
        self.routes.values()
    }

    /// Iterates routes mutably in match priority order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Route<T>> {
        self.routes.values_mut()
    }
}

impl<T: RouteTarget> Router<T> {
    /// Registers a route and returns it so the caller can attach hooks.
    ///
    /// The target decides the final method set from `methods`; see
    /// [`RouteTarget::resolve_methods`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError`] if the pattern string is already
    /// registered, the name is taken, the pattern does not compile, or the
    /// resolved method set is empty. Nothing is inserted on failure.
    pub fn add_route(
        &mut self,
        pattern: &str,
        target: T,
        methods: Option<MethodSet>,
        name: Option<&str>,
    ) -> Result<&mut Route<T>, RouteConfigError> {
        if self.routes.contains_key(pattern) {
            return Err(RouteConfigError::DuplicatePattern {
                pattern: pattern.to_string(),
            });
        }
        if let Some(name) = name {
            if self.names.contains_key(name) {
                return Err(RouteConfigError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let compiled = PathPattern::compile(pattern)?;
        let resolved = target.resolve_methods(methods);
        if resolved.is_empty() {
            return Err(RouteConfigError::EmptyMethods {
                pattern: pattern.to_string(),
            });
        }

        debug!(
            pattern = %pattern,
            methods = %resolved,
            name = name.unwrap_or(""),
            "route registered"
        );

        if let Some(name) = name {
            self.names.insert(name.to_string(), pattern.to_string());
        }
        let route = Route::new(compiled, resolved, name.map(str::to_string), target);
        let (index, _) = self.routes.insert_full(pattern.to_string(), route);
        Ok(&mut self.routes[index])
    }
}
