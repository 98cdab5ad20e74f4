//! Registered routes.

use http::Method;

use crate::error::PatternError;
use crate::method::MethodSet;
use crate::params::Params;
use crate::pattern::PathPattern;

/// Something that can sit behind a route and decide which methods it serves.
///
/// The router calls [`resolve_methods`](Self::resolve_methods) once at
/// registration. `requested` is the explicit method list the caller gave, or
/// `None` when the caller left it out.
pub trait RouteTarget {
    /// Computes the final allowed-method set for this target.
    fn resolve_methods(&self, requested: Option<MethodSet>) -> MethodSet;
}

/// Targets that carry no method information of their own accept whatever was
/// requested, or everything.
macro_rules! open_target {
    ($($ty:ty),*) => {
        $(
            impl RouteTarget for $ty {
                fn resolve_methods(&self, requested: Option<MethodSet>) -> MethodSet {
                    requested.unwrap_or_else(MethodSet::all)
                }
            }
        )*
    };
}

open_target!((), &str, String);

/// A pattern bound to a target, a method set and an optional name.
#[derive(Debug, Clone)]
pub struct Route<T> {
    pattern: PathPattern,
    methods: MethodSet,
    name: Option<String>,
    target: T,
}

impl<T> Route<T> {
    pub(crate) fn new(
        pattern: PathPattern,
        methods: MethodSet,
        name: Option<String>,
        target: T,
    ) -> Self {
        Self {
            pattern,
            methods,
            name,
            target,
        }
    }

    /// The compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The methods this route accepts.
    #[must_use]
    pub const fn methods(&self) -> MethodSet {
        self.methods
    }

    /// The route name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The target behind this route.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable access to the target, used to attach hooks after registration.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Returns true if `method` is allowed on this route.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Builds a concrete URL for this route.
    pub fn url(&self, params: &Params) -> Result<String, PatternError> {
        self.pattern.build(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_target_defaults_to_all() {
        assert!(().resolve_methods(None).is_all());
        let only_get = MethodSet::empty().with(&Method::GET);
        assert_eq!(().resolve_methods(Some(only_get)), only_get);
    }

    #[test]
    fn test_route_accessors() {
        let pattern = PathPattern::compile("/users/{id:int}").unwrap();
        let methods = MethodSet::empty().with(&Method::GET);
        let route = Route::new(pattern, methods, Some("user".to_string()), 7_u8);

        assert_eq!(route.pattern().as_str(), "/users/{id:int}");
        assert_eq!(route.name(), Some("user"));
        assert_eq!(*route.target(), 7);
        assert!(route.allows(&Method::GET));
        assert!(!route.allows(&Method::POST));

        let mut params = Params::new();
        params.push("id", 3_i64);
        assert_eq!(route.url(&params).unwrap(), "/users/3");
    }
}
