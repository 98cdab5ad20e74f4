//! Router error taxonomy.
//!
//! All of these are raised while routes are being registered or looked up by
//! name. None of them is produced by [`Router::match_path`](crate::Router::match_path),
//! which reports a miss as `None`.

use thiserror::Error;

/// A path pattern could not be compiled, or a URL could not be built from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern string was empty.
    #[error("path pattern must not be empty")]
    Empty,

    /// The pattern did not start with `/`.
    #[error("path pattern '{pattern}' must start with '/'")]
    MissingLeadingSlash {
        /// The offending pattern.
        pattern: String,
    },

    /// A segment mixed literal text and braces, or a brace was left open.
    #[error("malformed segment '{segment}' in path pattern '{pattern}'")]
    MalformedSegment {
        /// The offending pattern.
        pattern: String,
        /// The segment that failed to parse.
        segment: String,
    },

    /// Two captures share a name.
    #[error("duplicate parameter '{name}' in path pattern '{pattern}'")]
    DuplicateParam {
        /// The offending pattern.
        pattern: String,
        /// The repeated parameter name.
        name: String,
    },

    /// A capture declared a converter that does not exist.
    #[error("unknown converter '{converter}' in path pattern '{pattern}'")]
    UnknownConverter {
        /// The offending pattern.
        pattern: String,
        /// The unrecognised converter name.
        converter: String,
    },

    /// A `path` capture was followed by more segments.
    #[error("remainder parameter '{name}' must be the last segment of '{pattern}'")]
    RemainderNotLast {
        /// The offending pattern.
        pattern: String,
        /// The remainder parameter name.
        name: String,
    },

    /// A declared default does not satisfy its own converter.
    #[error("default '{value}' for parameter '{name}' in '{pattern}' does not convert")]
    InvalidDefault {
        /// The offending pattern.
        pattern: String,
        /// The parameter name.
        name: String,
        /// The rejected default.
        value: String,
    },

    /// URL building was missing a parameter that has no default.
    #[error("missing value for parameter '{name}' of '{pattern}'")]
    MissingParam {
        /// The pattern being built.
        pattern: String,
        /// The missing parameter name.
        name: String,
    },

    /// URL building received a value its converter rejects.
    #[error("value '{value}' is not valid for parameter '{name}' of '{pattern}'")]
    InvalidParam {
        /// The pattern being built.
        pattern: String,
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// A route could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteConfigError {
    /// The pattern itself is malformed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The exact pattern string is already registered.
    #[error("a route is already registered for pattern '{pattern}'")]
    DuplicatePattern {
        /// The repeated pattern.
        pattern: String,
    },

    /// The route name is already taken.
    #[error("a route named '{name}' is already registered")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// Method resolution left nothing the route could serve.
    #[error("route '{pattern}' does not allow any HTTP method")]
    EmptyMethods {
        /// The pattern being registered.
        pattern: String,
    },

    /// A method name outside the standard HTTP vocabulary.
    #[error("unknown HTTP method '{method}'")]
    UnknownMethod {
        /// The rejected method name, as given.
        method: String,
    },
}

/// Reverse lookup of a route name failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route named '{name}'")]
pub struct RouteNotFoundError {
    /// The name that was looked up.
    pub name: String,
}

impl RouteNotFoundError {
    /// Creates a new error for the given route name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
