//! The validation before-hook.

use std::fmt;
use std::sync::Arc;

use palladio_core::{BoxFuture, Handler, PalladioError, PalladioResult, Request, Response};
use palladio_router::Params;
use tracing::warn;

use crate::backend::{CompiledValidator, ValidationBackend};

/// A before-hook that validates the JSON request body.
///
/// Built by [`BackendRegistry::build_validation_hook`](crate::BackendRegistry::build_validation_hook),
/// which has already resolved the backend and compiled the schema. Per
/// request it decodes the body and runs the compiled validator; an
/// undecodable body is a `BadRequest`, a non-conforming one a `Validation`
/// error carrying every message.
#[derive(Clone)]
pub struct ValidationHook {
    backend_name: String,
    backend: Arc<dyn ValidationBackend>,
    compiled: CompiledValidator,
}

impl ValidationHook {
    pub(crate) fn new(
        backend_name: &str,
        backend: Arc<dyn ValidationBackend>,
        compiled: CompiledValidator,
    ) -> Self {
        Self {
            backend_name: backend_name.to_string(),
            backend,
            compiled,
        }
    }

    /// Name of the backend this hook validates with.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// The compiled schema.
    #[must_use]
    pub fn compiled(&self) -> &CompiledValidator {
        &self.compiled
    }

    /// Validates a request body.
    ///
    /// # Errors
    ///
    /// Returns [`PalladioError::BadRequest`] if the body is not JSON, and
    /// [`PalladioError::Validation`] if it does not conform.
    pub async fn check(&self, req: &Request) -> PalladioResult<()> {
        let document = req.json().await?;
        self.backend
            .validate(&self.compiled, &document)
            .map_err(|err| {
                warn!(
                    backend = %self.backend_name,
                    path = %req.path(),
                    violations = err.messages.len(),
                    "request body failed validation"
                );
                PalladioError::from(err)
            })
    }
}

impl Handler for ValidationHook {
    fn call<'a>(
        &'a self,
        req: &'a Request,
        _res: &'a mut Response,
        _params: &'a Params,
    ) -> BoxFuture<'a, PalladioResult<()>> {
        Box::pin(self.check(req))
    }
}

impl fmt::Debug for ValidationHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationHook")
            .field("backend", &self.backend_name)
            .finish_non_exhaustive()
    }
}
