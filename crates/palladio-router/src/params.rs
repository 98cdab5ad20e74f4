//! Path parameter values and storage.
//!
//! Captured parameters are converted at match time, so a handler reading
//! `{id:int}` gets an `i64` rather than re-parsing a string. Storage uses a
//! small-vector optimization to avoid heap allocations for the common case
//! of 1-4 parameters.

use std::fmt;

use smallvec::SmallVec;
use uuid::Uuid;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// A converted path parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Plain string segment (`{name}` or `{name:str}`).
    Str(String),
    /// Signed integer (`{name:int}`).
    Int(i64),
    /// Floating point number (`{name:float}`).
    Float(f64),
    /// UUID in any format accepted by [`Uuid::parse_str`] (`{name:uuid}`).
    Uuid(Uuid),
    /// Remaining segments joined by `/` (`{name:path}`).
    Path(String),
}

impl ParamValue {
    /// Returns the value as a string slice for `Str` and `Path` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Path(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer for `Int` values.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number for `Float` and `Int` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the UUID for `Uuid` values.
    #[must_use]
    pub const fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Path(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Uuid(u) => write!(f, "{}", u.hyphenated()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Uuid> for ParamValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Extracted path parameters from a route match.
///
/// Parameters are stored as (name, value) pairs. Names are unique within one
/// match because pattern compilation rejects duplicate captures.
///
/// # Example
///
/// ```rust
/// use palladio_router::{Params, ParamValue};
///
/// let mut params = Params::new();
/// params.push("userId", 123_i64);
/// params.push("action", "view");
///
/// assert_eq!(params.get_int("userId"), Some(123));
/// assert_eq!(params.get_str("action"), Some("view"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    /// Storage for parameter (name, value) pairs
    inner: SmallVec<[(String, ParamValue); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a params set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Adds a parameter, replacing any previous value under the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.inner.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.inner.push((name, value));
        }
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns a string-typed parameter.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Returns an integer-typed parameter.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    /// Returns a numeric parameter.
    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_float)
    }

    /// Returns a UUID-typed parameter.
    #[must_use]
    pub fn get_uuid(&self, name: &str) -> Option<Uuid> {
        self.get(name).and_then(ParamValue::as_uuid)
    }

    /// Returns true if a parameter with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(n, _)| n.as_str())
    }

    /// Clears all parameters, retaining allocated capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, ParamValue)>,
        fn(&'a (String, ParamValue)) -> (&'a str, &'a ParamValue),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_push_and_get() {
        let mut params = Params::new();
        params.push("id", 123_i64);
        params.push("name", "alice");

        assert_eq!(params.get("id"), Some(&ParamValue::Int(123)));
        assert_eq!(params.get_str("name"), Some("alice"));
        assert_eq!(params.get("unknown"), None);
    }

    #[test]
    fn test_params_typed_accessors_do_not_coerce_strings() {
        let mut params = Params::new();
        params.push("id", "123");

        assert_eq!(params.get_str("id"), Some("123"));
        assert_eq!(params.get_int("id"), None);
    }

    #[test]
    fn test_params_push_replaces_existing() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("a", "2");

        assert_eq!(params.len(), 1);
        assert_eq!(params.get_str("a"), Some("2"));
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", 2_i64);

        let names: Vec<_> = params.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_params_from_iterator() {
        let params: Params = vec![("a", 1_i64), ("b", 2_i64)].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get_int("b"), Some(2));
    }

    #[test]
    fn test_params_many_params() {
        // More than INLINE_PARAMS spills to the heap
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get_str("key5"), Some("value5"));
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::Int(42).to_string(), "42");
        assert_eq!(ParamValue::Float(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::Path("a/b".to_string()).to_string(), "a/b");
        let id = Uuid::nil();
        assert_eq!(
            ParamValue::Uuid(id).to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_param_value_int_as_float() {
        assert_eq!(ParamValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ParamValue::Str("3".into()).as_float(), None);
    }
}
