//! The standard HTTP method vocabulary.
//!
//! [`MethodSet`] is the allowed-method set attached to every route. Only the
//! nine methods defined by RFC 9110/5789 can be members; extension methods
//! are rejected at registration time.

use std::fmt;

use http::Method;

use crate::error::RouteConfigError;

/// The standard methods, in bit order.
const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

const ALL_BITS: u16 = (1 << STANDARD_METHODS.len()) - 1;

/// A set of standard HTTP methods.
///
/// # Example
///
/// ```rust
/// use palladio_router::MethodSet;
/// use http::Method;
///
/// let methods = MethodSet::parse(["get", "Post"]).unwrap();
///
/// assert!(methods.contains(&Method::GET));
/// assert!(methods.contains(&Method::POST));
/// assert!(!methods.contains(&Method::DELETE));
/// assert_eq!(methods.to_string(), "GET, POST");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet {
    bits: u16,
}

impl MethodSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Creates a set holding every standard method.
    #[must_use]
    pub const fn all() -> Self {
        Self { bits: ALL_BITS }
    }

    fn bit(method: &Method) -> Option<u16> {
        STANDARD_METHODS
            .iter()
            .position(|m| m == method)
            .map(|i| 1 << i)
    }

    /// Parses method names, normalising them to uppercase first.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError::UnknownMethod`] for names outside the
    /// standard vocabulary.
    pub fn parse<I, S>(names: I) -> Result<Self, RouteConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            let raw = name.as_ref();
            let upper = raw.trim().to_ascii_uppercase();
            let method = Method::from_bytes(upper.as_bytes())
                .ok()
                .filter(|m| Self::bit(m).is_some())
                .ok_or_else(|| RouteConfigError::UnknownMethod {
                    method: raw.to_string(),
                })?;
            set.insert(&method);
        }
        Ok(set)
    }

    /// Adds a method. Returns `false` if it is not a standard method.
    pub fn insert(&mut self, method: &Method) -> bool {
        match Self::bit(method) {
            Some(bit) => {
                self.bits |= bit;
                true
            }
            None => false,
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, method: &Method) -> Self {
        self.insert(method);
        self
    }

    /// Returns true if the method is in the set.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        Self::bit(method).is_some_and(|bit| self.bits & bit != 0)
    }

    /// Returns the methods present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns the methods present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns true if no methods are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns true if every standard method is present.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.bits == ALL_BITS
    }

    /// Returns the number of methods in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates the methods in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        STANDARD_METHODS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.bits & (1 << i) != 0)
            .map(|(_, m)| m.clone())
    }

    /// Returns the methods as a vector, e.g. for an `Allow` header.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Method> {
        self.iter().collect()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut set = Self::empty();
        for method in iter {
            set.insert(&method);
        }
        set
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for method in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_set_empty() {
        let set = MethodSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(&Method::GET));
    }

    #[test]
    fn test_method_set_all() {
        let set = MethodSet::all();
        assert!(set.is_all());
        assert_eq!(set.len(), 9);
        for method in &STANDARD_METHODS {
            assert!(set.contains(method));
        }
    }

    #[test]
    fn test_method_set_parse_uppercases() {
        let set = MethodSet::parse(["get", "pOsT", " delete "]).unwrap();
        assert!(set.contains(&Method::GET));
        assert!(set.contains(&Method::POST));
        assert!(set.contains(&Method::DELETE));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_method_set_parse_rejects_unknown() {
        let err = MethodSet::parse(["GET", "PURGE"]).unwrap_err();
        assert_eq!(
            err,
            RouteConfigError::UnknownMethod {
                method: "PURGE".to_string()
            }
        );
    }

    #[test]
    fn test_method_set_insert_extension_method() {
        let mut set = MethodSet::empty();
        let purge = Method::from_bytes(b"PURGE").unwrap();
        assert!(!set.insert(&purge));
        assert!(set.is_empty());
    }

    #[test]
    fn test_method_set_intersection_and_union() {
        let a = MethodSet::empty().with(&Method::GET).with(&Method::POST);
        let b = MethodSet::empty().with(&Method::POST).with(&Method::PUT);

        let both = a.intersection(b);
        assert_eq!(both.to_vec(), vec![Method::POST]);

        let either = a.union(b);
        assert_eq!(either.len(), 3);
    }

    #[test]
    fn test_method_set_display() {
        let set: MethodSet = [Method::POST, Method::GET].into_iter().collect();
        assert_eq!(set.to_string(), "GET, POST");
    }
}
