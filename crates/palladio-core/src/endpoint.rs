//! What a route points at: a handler plus its hooks.

use std::fmt;
use std::sync::Arc;

use http::Method;
use palladio_router::{MethodSet, RouteTarget};

use crate::error::{PalladioError, PalladioResult};
use crate::handler::{Handler, Hook};
use crate::view::View;

/// Ordered before and after hooks.
///
/// Hooks run in the order they were added.
#[derive(Clone, Default)]
pub struct Hooks {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl Hooks {
    /// Creates an empty hook list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a before-hook.
    pub fn push_before(&mut self, hook: Hook) {
        self.before.push(hook);
    }

    /// Appends an after-hook.
    pub fn push_after(&mut self, hook: Hook) {
        self.after.push(hook);
    }

    /// Appends every hook from `other`, keeping its order.
    pub fn extend(&mut self, other: &Self) {
        self.before.extend(other.before.iter().cloned());
        self.after.extend(other.after.iter().cloned());
    }

    /// Before-hooks in run order.
    #[must_use]
    pub fn before(&self) -> &[Hook] {
        &self.before
    }

    /// After-hooks in run order.
    #[must_use]
    pub fn after(&self) -> &[Hook] {
        &self.after
    }

    /// Returns true if there are no hooks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

/// The handler behind a route.
#[derive(Clone)]
pub enum HandlerKind {
    /// One handler for every allowed method.
    Function(Arc<dyn Handler>),
    /// Per-method handlers.
    View(View),
}

/// A route target: a handler plus the route's own hooks.
///
/// Method resolution at registration:
///
/// - a function handler serves the requested methods, or all of them;
/// - a view serves exactly its capabilities, whatever was requested.
///
/// Besides hooks for the whole route, an endpoint can carry hooks for one
/// method only. They run just around the handler, so a body schema on a
/// view's `post` never runs for its `get`.
#[derive(Clone)]
pub struct Endpoint {
    kind: HandlerKind,
    hooks: Hooks,
    method_hooks: Vec<(Method, Hooks)>,
}

impl Endpoint {
    /// Wraps a single handler.
    #[must_use]
    pub fn function(handler: Arc<dyn Handler>) -> Self {
        Self {
            kind: HandlerKind::Function(handler),
            hooks: Hooks::new(),
            method_hooks: Vec::new(),
        }
    }

    /// Wraps a per-method view.
    #[must_use]
    pub fn view(view: View) -> Self {
        Self {
            kind: HandlerKind::View(view),
            hooks: Hooks::new(),
            method_hooks: Vec::new(),
        }
    }

    /// The wrapped handler.
    #[must_use]
    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    /// The route's own hooks.
    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Mutable access to the route's hooks, for the decoration phase.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Hooks that run only for `method`.
    #[must_use]
    pub fn method_hooks(&self, method: &Method) -> Option<&Hooks> {
        self.method_hooks
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, hooks)| hooks)
    }

    /// Mutable access to the hooks for one method, creating the list.
    pub fn method_hooks_mut(&mut self, method: Method) -> &mut Hooks {
        let index = match self.method_hooks.iter().position(|(m, _)| *m == method) {
            Some(index) => index,
            None => {
                self.method_hooks.push((method, Hooks::new()));
                self.method_hooks.len() - 1
            }
        };
        &mut self.method_hooks[index].1
    }

    /// Builder form of adding a before-hook for one method.
    #[must_use]
    pub fn with_method_before(mut self, method: Method, hook: Hook) -> Self {
        self.method_hooks_mut(method).push_before(hook);
        self
    }

    /// Builder form of adding an after-hook for one method.
    #[must_use]
    pub fn with_method_after(mut self, method: Method, hook: Hook) -> Self {
        self.method_hooks_mut(method).push_after(hook);
        self
    }

    /// Builder form of adding a before-hook.
    #[must_use]
    pub fn with_before(mut self, hook: Hook) -> Self {
        self.hooks.push_before(hook);
        self
    }

    /// Builder form of adding an after-hook.
    #[must_use]
    pub fn with_after(mut self, hook: Hook) -> Self {
        self.hooks.push_after(hook);
        self
    }

    /// Selects the handler for a method.
    ///
    /// # Errors
    ///
    /// Returns [`PalladioError::MethodNotAllowed`] if a view has no handler
    /// for `method`.
    pub fn handler_for(&self, method: &Method) -> PalladioResult<&Arc<dyn Handler>> {
        match &self.kind {
            HandlerKind::Function(handler) => Ok(handler),
            HandlerKind::View(view) => view.handler_for(method).ok_or_else(|| {
                PalladioError::method_not_allowed(method.clone(), view.capabilities())
            }),
        }
    }
}

impl RouteTarget for Endpoint {
    fn resolve_methods(&self, requested: Option<MethodSet>) -> MethodSet {
        match &self.kind {
            HandlerKind::Function(_) => requested.unwrap_or_else(MethodSet::all),
            HandlerKind::View(view) => view.capabilities(),
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            HandlerKind::Function(_) => "function",
            HandlerKind::View(_) => "view",
        };
        f.debug_struct("Endpoint")
            .field("kind", &kind)
            .field("hooks", &self.hooks)
            .field(
                "method_hooks",
                &self.method_hooks.iter().map(|(m, _)| m).collect::<Vec<_>>(),
            )
            .finish()
    }
}
