//! Path pattern compilation and matching.
//!
//! A pattern is a `/`-separated list of segments. Each segment is either a
//! literal or a named capture:
//!
//! | Segment                   | Meaning                                   |
//! |---------------------------|-------------------------------------------|
//! | `users`                   | literal, must match exactly               |
//! | `{id}`                    | any non-empty segment, kept as a string   |
//! | `{id:int}`                | segment parsed as `i64`                   |
//! | `{ratio:float}`           | segment parsed as `f64`                   |
//! | `{key:uuid}`              | segment parsed as a UUID                  |
//! | `{rest:path}`             | one or more trailing segments, last only  |
//! | `{page:int=1}`            | capture with a default used by URL building |
//!
//! Empty segments are ignored on both sides, so `/users/` and `/users`
//! compile and match identically.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use uuid::Uuid;

use crate::error::PatternError;
use crate::params::{ParamValue, Params};

/// A type converter applied to a captured segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    /// Any non-empty segment.
    Str,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// UUID.
    Uuid,
    /// Remainder of the path, possibly spanning several segments.
    Path,
}

impl Converter {
    /// Looks up a converter by the name used in patterns.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" | "string" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    /// Returns the canonical converter name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Uuid => "uuid",
            Self::Path => "path",
        }
    }

    /// Converts a raw segment, returning `None` if it does not satisfy the
    /// converter.
    #[must_use]
    pub fn convert(self, raw: &str) -> Option<ParamValue> {
        if raw.is_empty() {
            return None;
        }
        match self {
            Self::Str => Some(ParamValue::Str(raw.to_string())),
            Self::Int => raw.parse::<i64>().ok().map(ParamValue::Int),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ParamValue::Float),
            Self::Uuid => Uuid::parse_str(raw).ok().map(ParamValue::Uuid),
            Self::Path => Some(ParamValue::Path(raw.to_string())),
        }
    }
}

/// A named capture within a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    name: String,
    converter: Converter,
    default: Option<ParamValue>,
}

impl ParamSpec {
    /// The capture name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The converter applied on match.
    #[must_use]
    pub const fn converter(&self) -> Converter {
        self.converter
    }

    /// The default used when building a URL without this parameter.
    #[must_use]
    pub const fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }
}

/// One compiled segment of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Exact text.
    Literal(String),
    /// Named capture.
    Param(ParamSpec),
}

/// A compiled path pattern.
///
/// Compiled once at registration and immutable afterwards.
///
/// # Example
///
/// ```rust
/// use palladio_router::PathPattern;
///
/// let pattern = PathPattern::compile("/items/{id:int}").unwrap();
///
/// let params = pattern.match_path("/items/42").unwrap();
/// assert_eq!(params.get_int("id"), Some(42));
///
/// assert!(pattern.match_path("/items/abc").is_none());
/// assert!(pattern.match_path("/items/42/extra").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Splits a path into its non-empty segments.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PathPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is empty, does not start with
    /// `/`, contains a malformed segment, repeats a capture name, names an
    /// unknown converter, places a `path` capture before the last segment or
    /// declares a default its converter rejects.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }

        let raw_segments: Vec<&str> = split_segments(pattern).collect();
        let mut segments = Vec::with_capacity(raw_segments.len());
        let mut seen = HashSet::new();

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = Self::parse_segment(pattern, raw)?;
            if let Segment::Param(spec) = &segment {
                if !seen.insert(spec.name.clone()) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: spec.name.clone(),
                    });
                }
                if spec.converter == Converter::Path && index + 1 != raw_segments.len() {
                    return Err(PatternError::RemainderNotLast {
                        pattern: pattern.to_string(),
                        name: spec.name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, PatternError> {
        let malformed = || PatternError::MalformedSegment {
            pattern: pattern.to_string(),
            segment: raw.to_string(),
        };

        let Some(body) = raw.strip_prefix('{') else {
            if raw.contains('{') || raw.contains('}') {
                return Err(malformed());
            }
            return Ok(Segment::Literal(raw.to_string()));
        };
        let body = body.strip_suffix('}').ok_or_else(malformed)?;
        if body.contains('{') || body.contains('}') {
            return Err(malformed());
        }

        let (decl, default) = match body.split_once('=') {
            Some((decl, default)) => (decl, Some(default)),
            None => (body, None),
        };
        let (name, converter_name) = match decl.split_once(':') {
            Some((name, conv)) => (name.trim(), Some(conv.trim())),
            None => (decl.trim(), None),
        };
        if !is_valid_name(name) {
            return Err(malformed());
        }

        let converter = match converter_name {
            Some(conv) => {
                Converter::from_name(conv).ok_or_else(|| PatternError::UnknownConverter {
                    pattern: pattern.to_string(),
                    converter: conv.to_string(),
                })?
            }
            None => Converter::Str,
        };

        let default = match default {
            Some(value) => Some(converter.convert(value).ok_or_else(|| {
                PatternError::InvalidDefault {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Segment::Param(ParamSpec {
            name: name.to_string(),
            converter,
            default,
        }))
    }

    /// Returns the pattern string this was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the declared capture names, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(spec) => Some(spec.name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns true if the last segment is a `path` capture.
    #[must_use]
    pub fn has_remainder(&self) -> bool {
        matches!(
            self.segments.last(),
            Some(Segment::Param(spec)) if spec.converter == Converter::Path
        )
    }

    /// Matches a request path, returning the converted captures.
    ///
    /// Returns `None` on segment-count mismatch (unless the pattern ends in a
    /// `path` capture), on any literal mismatch, or when a converter rejects
    /// its segment.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let parts: SmallVec<[&str; 8]> = split_segments(path).collect();

        if self.has_remainder() {
            if parts.len() < self.segments.len() {
                return None;
            }
        } else if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::with_capacity(self.segments.len());
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(expected) => {
                    if expected != parts[index] {
                        return None;
                    }
                }
                Segment::Param(spec) if spec.converter == Converter::Path => {
                    params.push(spec.name.clone(), ParamValue::Path(parts[index..].join("/")));
                }
                Segment::Param(spec) => {
                    let value = spec.converter.convert(parts[index])?;
                    params.push(spec.name.clone(), value);
                }
            }
        }

        Some(params)
    }

    /// Builds a concrete path from parameter values.
    ///
    /// Missing parameters fall back to their declared default.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::MissingParam`] when a parameter has neither a
    /// value nor a default, and [`PatternError::InvalidParam`] when a value
    /// would not match its own converter.
    ///
    /// # Example
    ///
    /// ```rust
    /// use palladio_router::{Params, PathPattern};
    ///
    /// let pattern = PathPattern::compile("/users/{id:int}/posts/{page:int=1}").unwrap();
    /// let mut params = Params::new();
    /// params.push("id", 7_i64);
    ///
    /// assert_eq!(pattern.build(&params).unwrap(), "/users/7/posts/1");
    /// ```
    pub fn build(&self, params: &Params) -> Result<String, PatternError> {
        let mut path = String::with_capacity(self.raw.len());

        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(spec) => {
                    let value = params
                        .get(&spec.name)
                        .or(spec.default.as_ref())
                        .ok_or_else(|| PatternError::MissingParam {
                            pattern: self.raw.clone(),
                            name: spec.name.clone(),
                        })?;
                    let rendered = value.to_string();
                    let valid = match spec.converter {
                        Converter::Path => split_segments(&rendered).next().is_some(),
                        other => other.convert(&rendered).is_some() && !rendered.contains('/'),
                    };
                    if !valid {
                        return Err(PatternError::InvalidParam {
                            pattern: self.raw.clone(),
                            name: spec.name.clone(),
                            value: rendered,
                        });
                    }
                    path.push_str(rendered.trim_matches('/'));
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Compiles a copy of this pattern nested under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the prefix is malformed or introduces a
    /// capture name that collides with this pattern.
    pub fn prefixed(&self, prefix: &str) -> Result<Self, PatternError> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Ok(self.clone());
        }
        Self::compile(&format!("{prefix}{}", self.raw))
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
