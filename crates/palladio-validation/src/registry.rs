//! Named backends, the process-wide default and the compiled-validator cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::{CompiledValidator, ValidationBackend};
use crate::error::{UnknownValidationBackendError, ValidationSetupError};
use crate::hook::ValidationHook;
use crate::json_schema::{JsonSchemaBackend, JSONSCHEMA, JSONSCHEMA_DRAFT7};

/// Cache key: backend name and the schema's canonical serialization.
type CacheKey = (String, String);

/// Serializes `value` with object keys sorted at every level.
///
/// Independent of serde_json's map ordering, so equal schemas written in
/// different key orders share one cache entry.
fn canonical(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            let fields: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{}:{}", Value::from(key.as_str()), canonical(value)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

/// A set of named validation backends.
///
/// Registration takes `&mut self`; compiling and building hooks take
/// `&self`. The compiled-validator cache is the only shared mutable state
/// and sits behind a read-write lock.
///
/// # Example
///
/// ```rust
/// use palladio_validation::{BackendRegistry, JsonSchemaBackend};
/// use serde_json::json;
///
/// let mut registry = BackendRegistry::new();
/// assert_eq!(registry.default_backend_name(), Some("jsonschema"));
///
/// registry.register_backend("strict", JsonSchemaBackend::draft7(), true);
/// assert_eq!(registry.default_backend_name(), Some("strict"));
///
/// let hook = registry
///     .build_validation_hook(&json!({ "required": ["price"] }), None)
///     .unwrap();
/// assert_eq!(hook.backend_name(), "strict");
/// ```
pub struct BackendRegistry {
    backends: IndexMap<String, Arc<dyn ValidationBackend>>,
    default: Option<String>,
    cache: RwLock<HashMap<CacheKey, CompiledValidator>>,
    cache_enabled: bool,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    /// Creates a registry with the builtin JSON Schema backends.
    ///
    /// `"jsonschema"` (draft 4) is registered first and becomes the default;
    /// `"jsonschema_draft7"` is also available.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(JSONSCHEMA, JsonSchemaBackend::draft4());
        registry.register(JSONSCHEMA_DRAFT7, JsonSchemaBackend::draft7());
        registry
    }

    /// Creates a registry with no backends and no default.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            backends: IndexMap::new(),
            default: None,
            cache: RwLock::new(HashMap::new()),
            cache_enabled: true,
        }
    }

    /// Registers a backend. It becomes the default only if none is set yet.
    ///
    /// Registering under an existing name replaces that backend and drops
    /// its cached validators.
    pub fn register(&mut self, name: impl Into<String>, backend: impl ValidationBackend) {
        let set_as_default = self.default.is_none();
        self.register_backend(name, backend, set_as_default);
    }

    /// Registers a backend, optionally making it the default.
    pub fn register_backend(
        &mut self,
        name: impl Into<String>,
        backend: impl ValidationBackend,
        set_as_default: bool,
    ) {
        self.register_arc(name, Arc::new(backend), set_as_default);
    }

    /// Registers an already shared backend.
    pub fn register_arc(
        &mut self,
        name: impl Into<String>,
        backend: Arc<dyn ValidationBackend>,
        set_as_default: bool,
    ) {
        let name = name.into();
        if self.backends.insert(name.clone(), backend).is_some() {
            self.cache.write().retain(|(backend, _), _| *backend != name);
        }
        info!(backend = %name, default = set_as_default, "validation backend registered");
        if set_as_default {
            self.default = Some(name);
        }
    }

    /// Sets the default backend name.
    ///
    /// The name is not checked here: resolution fails later, when a hook is
    /// built, if nothing is registered under it.
    pub fn set_default_backend(&mut self, name: impl Into<String>) {
        let name = name.into();
        info!(backend = %name, "default validation backend changed");
        self.default = Some(name);
    }

    /// The current default backend name, if one is set.
    #[must_use]
    pub fn default_backend_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Registered backend names, in registration order.
    pub fn backend_names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// Returns true if a backend is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Resolves a backend by name, or the default when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownValidationBackendError`] if nothing is registered
    /// under the resolved name.
    pub fn get_backend(
        &self,
        name: Option<&str>,
    ) -> Result<(&str, &Arc<dyn ValidationBackend>), UnknownValidationBackendError> {
        let resolved = name.or(self.default.as_deref()).unwrap_or_default();
        self.backends
            .get_key_value(resolved)
            .map(|(name, backend)| (name.as_str(), backend))
            .ok_or_else(|| UnknownValidationBackendError::new(resolved))
    }

    /// Enables or disables the compiled-validator cache.
    ///
    /// Disabling it also empties it.
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
        if !enabled {
            self.cache.write().clear();
        }
    }

    /// Returns true if compiled validators are cached.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Number of cached compiled validators.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Compiles a schema with the named (or default) backend.
    ///
    /// Identical schemas compiled by the same backend share one validator
    /// while the cache is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationSetupError`] if the backend does not resolve or
    /// rejects the schema.
    pub fn compile(
        &self,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<CompiledValidator, ValidationSetupError> {
        let (name, strategy) = self.get_backend(backend)?;
        Ok(self.compile_with(name, strategy.as_ref(), schema)?)
    }

    fn compile_with(
        &self,
        name: &str,
        strategy: &dyn ValidationBackend,
        schema: &Value,
    ) -> Result<CompiledValidator, crate::error::SchemaError> {
        if !self.cache_enabled {
            return strategy.compile(schema);
        }

        let key = (name.to_string(), canonical(schema));
        if let Some(compiled) = self.cache.read().get(&key) {
            debug!(backend = %name, "compiled validator cache hit");
            return Ok(compiled.clone());
        }

        let compiled = strategy.compile(schema)?;
        Ok(self
            .cache
            .write()
            .entry(key)
            .or_insert(compiled)
            .clone())
    }

    /// Builds a before-hook that validates request bodies against `schema`.
    ///
    /// Everything that can fail is checked here, so misconfiguration
    /// surfaces at startup rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationSetupError::UnknownBackend`] if the backend does
    /// not resolve, and [`ValidationSetupError::Schema`] if the schema does
    /// not compile.
    pub fn build_validation_hook(
        &self,
        schema: &Value,
        backend: Option<&str>,
    ) -> Result<ValidationHook, ValidationSetupError> {
        let (name, strategy) = self.get_backend(backend)?;
        let compiled = self.compile_with(name, strategy.as_ref(), schema)?;
        debug!(backend = %name, "validation hook built");
        Ok(ValidationHook::new(name, Arc::clone(strategy), compiled))
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.backends.keys().collect::<Vec<_>>())
            .field("default", &self.default)
            .field("cache_enabled", &self.cache_enabled)
            .field("cached", &self.cached_len())
            .finish()
    }
}
