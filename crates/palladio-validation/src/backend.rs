//! The validation backend abstraction.
//!
//! A backend turns a schema into a [`CompiledValidator`] once, and the
//! compiled validator is then run against every request body. Compiled
//! validators are immutable and shared freely across concurrent requests.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{SchemaError, ValidationError};

/// A compiled, reentrant document check.
pub trait Validator: Send + Sync {
    /// Checks a document, reporting every violation.
    fn validate(&self, document: &Value) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        self(document)
    }
}

/// A schema compiled by some backend.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct CompiledValidator {
    inner: Arc<dyn Validator>,
}

impl CompiledValidator {
    /// Wraps a validator.
    pub fn new(validator: impl Validator + 'static) -> Self {
        Self {
            inner: Arc::new(validator),
        }
    }

    /// Runs the validator.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violation.
    pub fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        self.inner.validate(document)
    }

    /// Returns true if both handles share one compiled validator.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator").finish_non_exhaustive()
    }
}

/// A named strategy for schema validation.
///
/// Backends are registered with a
/// [`BackendRegistry`](crate::BackendRegistry) under a name. Compilation must
/// be schema-pure: compiling the same schema twice yields validators that
/// behave identically.
///
/// # Example
///
/// ```rust
/// use palladio_validation::{CompiledValidator, SchemaError, ValidationBackend, ValidationError};
/// use serde_json::{json, Value};
///
/// /// Only checks that listed fields are present.
/// struct RequiredFields;
///
/// impl ValidationBackend for RequiredFields {
///     fn compile(&self, schema: &Value) -> Result<CompiledValidator, SchemaError> {
///         let fields: Vec<String> = schema
///             .get("required")
///             .and_then(Value::as_array)
///             .ok_or_else(|| SchemaError::new("required_fields", "missing 'required' list"))?
///             .iter()
///             .filter_map(|v| v.as_str().map(str::to_string))
///             .collect();
///
///         Ok(CompiledValidator::new(move |doc: &Value| {
///             let missing: Vec<String> = fields
///                 .iter()
///                 .filter(|f| doc.get(f.as_str()).is_none())
///                 .map(|f| format!("{f} is required"))
///                 .collect();
///             if missing.is_empty() { Ok(()) } else { Err(ValidationError::new(missing)) }
///         }))
///     }
/// }
///
/// let compiled = RequiredFields.compile(&json!({ "required": ["price"] })).unwrap();
/// assert!(RequiredFields.validate(&compiled, &json!({ "price": 1 })).is_ok());
/// assert!(RequiredFields.validate(&compiled, &json!({})).is_err());
/// ```
pub trait ValidationBackend: Send + Sync + 'static {
    /// Compiles a schema into a reusable validator.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema is malformed.
    fn compile(&self, schema: &Value) -> Result<CompiledValidator, SchemaError>;

    /// Validates a document against a compiled schema.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violation.
    fn validate(&self, compiled: &CompiledValidator, document: &Value) -> Result<(), ValidationError> {
        compiled.validate(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_validator() {
        let compiled = CompiledValidator::new(|doc: &Value| {
            if doc.is_object() {
                Ok(())
            } else {
                Err(ValidationError::single("expected an object"))
            }
        });

        assert!(compiled.validate(&json!({})).is_ok());
        let err = compiled.validate(&json!([])).unwrap_err();
        assert_eq!(err.messages, vec!["expected an object".to_string()]);
    }

    #[test]
    fn test_clone_shares_validator() {
        let compiled = CompiledValidator::new(|_: &Value| Ok::<(), ValidationError>(()));
        let clone = compiled.clone();
        assert!(compiled.ptr_eq(&clone));

        let other = CompiledValidator::new(|_: &Value| Ok::<(), ValidationError>(()));
        assert!(!compiled.ptr_eq(&other));
    }
}
