//! JSON Schema backends built on the `jsonschema` crate.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::backend::{CompiledValidator, ValidationBackend};
use crate::error::{SchemaError, ValidationError};

/// Registry name of the draft 4 backend.
pub const JSONSCHEMA: &str = "jsonschema";

/// Registry name of the draft 7 backend.
pub const JSONSCHEMA_DRAFT7: &str = "jsonschema_draft7";

/// JSON Schema validation for a fixed draft.
///
/// Schemas are checked against the draft's meta-schema when compiled, so a
/// structurally wrong schema is a [`SchemaError`] rather than a validator
/// that rejects everything. Validation reports every violation.
///
/// # Example
///
/// ```rust
/// use palladio_validation::{JsonSchemaBackend, ValidationBackend};
/// use serde_json::json;
///
/// let backend = JsonSchemaBackend::draft4();
/// let compiled = backend
///     .compile(&json!({ "required": ["price", "name"] }))
///     .unwrap();
///
/// let err = backend.validate(&compiled, &json!({})).unwrap_err();
/// assert_eq!(err.messages.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaBackend {
    draft: Draft,
}

impl JsonSchemaBackend {
    /// Draft 4, the default dialect.
    #[must_use]
    pub const fn draft4() -> Self {
        Self {
            draft: Draft::Draft4,
        }
    }

    /// Draft 7.
    #[must_use]
    pub const fn draft7() -> Self {
        Self {
            draft: Draft::Draft7,
        }
    }

    fn name(&self) -> &'static str {
        match self.draft {
            Draft::Draft7 => JSONSCHEMA_DRAFT7,
            _ => JSONSCHEMA,
        }
    }
}

impl Default for JsonSchemaBackend {
    fn default() -> Self {
        Self::draft4()
    }
}

impl ValidationBackend for JsonSchemaBackend {
    fn compile(&self, schema: &Value) -> Result<CompiledValidator, SchemaError> {
        let compiled = JSONSchema::options()
            .with_draft(self.draft)
            .compile(schema)
            .map_err(|e| SchemaError::new(self.name(), e.to_string()))?;

        Ok(CompiledValidator::new(move |document: &Value| {
            compiled.validate(document).map_err(|errors| {
                ValidationError::new(errors.map(|e| e.to_string()).collect())
            })
        }))
    }
}
