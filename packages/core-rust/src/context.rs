//! Per-request context carried across asynchronous scheduling boundaries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ContextError;
use crate::scope::{self, ContextScope};
use crate::wrappers::{
    ContextAwareBiFn, ContextAwareFallibleBiFn, ContextAwareFallibleFn, ContextAwareFn,
    ContextAwarePeriodicTask, ContextAwareTask,
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for one logical call chain's ambient state.
///
/// Cheap to clone (shared inner); identity is the shared allocation, so two
/// clones of the same context compare equal while two contexts built from
/// identical metadata do not. The context is never mutated by this layer --
/// it is read-shared across arbitrarily many concurrent wrapper invocations.
#[derive(Debug, Clone)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    id: u64,
    trace_id: String,
    tenant_id: Option<String>,
}

impl RequestContext {
    /// Creates a context for a single-tenant call chain.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidArgument`] if `trace_id` is empty.
    pub fn new(trace_id: impl Into<String>) -> Result<Self, ContextError> {
        Self::build(trace_id.into(), None)
    }

    /// Creates a context scoped to a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidArgument`] if `trace_id` or
    /// `tenant_id` is empty.
    pub fn with_tenant(
        trace_id: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Result<Self, ContextError> {
        let tenant_id = tenant_id.into();
        if tenant_id.is_empty() {
            return Err(ContextError::InvalidArgument("tenant_id must not be empty"));
        }
        Self::build(trace_id.into(), Some(tenant_id))
    }

    fn build(trace_id: String, tenant_id: Option<String>) -> Result<Self, ContextError> {
        if trace_id.is_empty() {
            return Err(ContextError::InvalidArgument("trace_id must not be empty"));
        }
        Ok(Self {
            inner: Arc::new(ContextInner {
                id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                trace_id,
                tenant_id,
            }),
        })
    }

    /// Returns the context active on the calling thread, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        scope::current_context()
    }

    /// Activates this context on the calling thread.
    ///
    /// The returned [`ContextScope`] restores the previously active context
    /// when dropped; hold it for exactly the dynamic extent of the work
    /// that should observe this context.
    #[must_use = "dropping the scope immediately deactivates the context"]
    pub fn push(&self) -> ContextScope {
        scope::enter(self)
    }

    /// Process-unique numeric identifier of this context.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Distributed trace identifier for observability.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.inner.trace_id
    }

    /// Tenant scope, if this call chain is tenant-bound.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.inner.tenant_id.as_deref()
    }

    /// Closes a one-shot zero-argument callable over this context.
    pub fn wrap_task<F, R>(&self, task: F) -> ContextAwareTask<F>
    where
        F: FnOnce() -> R,
    {
        ContextAwareTask::new(self, task)
    }

    /// Closes a reusable zero-argument callable over this context, for
    /// repeated invocation (periodic scheduling).
    pub fn wrap_periodic<F>(&self, task: F) -> ContextAwarePeriodicTask<F>
    where
        F: FnMut(),
    {
        ContextAwarePeriodicTask::new(self, task)
    }

    /// Closes a one-argument callable over this context.
    pub fn wrap_fn<F, T, R>(&self, func: F) -> ContextAwareFn<F>
    where
        F: FnOnce(T) -> R,
    {
        ContextAwareFn::new(self, func)
    }

    /// Closes a two-argument callable over this context.
    pub fn wrap_bi_fn<F, T, U, R>(&self, func: F) -> ContextAwareBiFn<F>
    where
        F: FnMut(T, U) -> R,
    {
        ContextAwareBiFn::new(self, func)
    }

    /// Like [`wrap_fn`](Self::wrap_fn), with a fallback that converts the
    /// callable's failure into a substitute result.
    pub fn wrap_fn_or_else<F, H, T, R, E>(
        &self,
        func: F,
        handler: H,
    ) -> ContextAwareFallibleFn<F, H>
    where
        F: FnOnce(T) -> Result<R, E>,
        H: FnOnce(E) -> R,
    {
        ContextAwareFallibleFn::new(self, func, handler)
    }

    /// Like [`wrap_bi_fn`](Self::wrap_bi_fn), with a fallback that converts
    /// the callable's failure into a substitute result.
    pub fn wrap_bi_fn_or_else<F, H, T, U, R, E>(
        &self,
        func: F,
        handler: H,
    ) -> ContextAwareFallibleBiFn<F, H>
    where
        F: FnOnce(T, U) -> Result<R, E>,
        H: FnOnce(E) -> R,
    {
        ContextAwareFallibleBiFn::new(self, func, handler)
    }
}

impl PartialEq for RequestContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RequestContext {}

impl std::hash::Hash for RequestContext {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}
