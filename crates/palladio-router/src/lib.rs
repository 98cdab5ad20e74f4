//! Ordered path-pattern router for Palladio.
//!
//! This crate maps a request path to a registered route and the typed
//! parameters captured from it. It knows nothing about handlers or hooks:
//! whatever sits behind a route is the generic `T` of [`Router<T>`].
//!
//! # Features
//!
//! - **Typed Captures**: `{id:int}`, `{ratio:float}`, `{key:uuid}`, `{rest:path}`
//! - **Insertion-Order Priority**: the first registered pattern that matches wins
//! - **Method Sets**: each route carries the methods it accepts, checked by the caller
//! - **Reverse Lookup**: named routes resolve back to concrete URLs
//!
//! # Example
//!
//! ```rust
//! use palladio_router::{MethodSet, Params, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! let methods = MethodSet::parse(["GET"]).unwrap();
//! router
//!     .add_route("/items/{id:int}", "showItem", Some(methods), Some("item"))
//!     .unwrap();
//!
//! let found = router.match_path("/items/42").unwrap();
//! assert!(found.route.allows(&Method::GET));
//! assert!(!found.route.allows(&Method::POST));
//! assert_eq!(found.params.get_int("id"), Some(42));
//!
//! let mut params = Params::new();
//! params.push("id", 7_i64);
//! let route = router.get_route_or_404("item").unwrap();
//! assert_eq!(route.url(&params).unwrap(), "/items/7");
//! ```
//!
//! # Concurrency
//!
//! Registration takes `&mut Router`, matching takes `&Router`. Finish
//! registering before sharing the router across tasks; there is no internal
//! locking.

mod error;
mod method;
mod params;
mod pattern;
mod route;
mod router;

pub use error::{PatternError, RouteConfigError, RouteNotFoundError};
pub use method::MethodSet;
pub use params::{ParamValue, Params};
pub use pattern::{Converter, ParamSpec, PathPattern, Segment};
pub use route::{Route, RouteTarget};
pub use router::Router;

/// A matched route with its extracted parameters.
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    /// The matched route
    pub route: &'a Route<T>,
    /// Converted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(route: &'a Route<T>, params: Params) -> Self {
        Self { route, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router.add_route("/users", "listUsers", None, None).unwrap();
        router.add_route("/users/{id}", "getUser", None, None).unwrap();

        let m = router.match_path("/users").unwrap();
        assert_eq!(*m.route.target(), "listUsers");
        assert!(m.params.is_empty());

        let m = router.match_path("/users/123").unwrap();
        assert_eq!(*m.route.target(), "getUser");
        assert_eq!(m.params.get_str("id"), Some("123"));
    }

    #[test]
    fn test_not_found_vs_method_not_allowed() {
        let mut router = Router::new();
        let get = MethodSet::parse(["GET"]).unwrap();
        router.add_route("/users", (), Some(get), None).unwrap();

        assert!(router.match_path("/teams").is_none());

        let m = router.match_path("/users").unwrap();
        assert!(!m.route.allows(&Method::DELETE));
        assert_eq!(m.route.methods().to_string(), "GET");
    }

    #[test]
    fn test_param_keys_equal_declared_names() {
        let mut router = Router::new();
        router
            .add_route("/orgs/{org}/repos/{repo}/files/{rest:path}", (), None, None)
            .unwrap();

        let m = router.match_path("/orgs/acme/repos/site/files/a/b/c.txt").unwrap();
        let declared: Vec<_> = m.route.pattern().param_names().collect();
        let captured: Vec<_> = m.params.names().collect();
        assert_eq!(declared, captured);
        assert_eq!(m.params.get_str("rest"), Some("a/b/c.txt"));
    }

    #[test]
    fn test_empty_router_matches_nothing() {
        let router: Router<()> = Router::new();
        assert!(router.match_path("/").is_none());
    }
}
