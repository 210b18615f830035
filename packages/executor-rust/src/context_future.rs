//! Context-aware decorators over [`TaskFuture`], [`Promise`], and
//! [`ProgressivePromise`].
//!
//! Every listener registered through a decorator is closed over the
//! decorator's context before being handed to the underlying instance, so
//! continuations observe the right ambient state no matter which thread
//! completes the future. Value accessors and completion operations run no
//! user code and forward unmodified.

use std::pin::Pin;
use std::task::{Context, Poll};

use ctxflow_core::{ContextAwareBiFn, ContextAwareFn, RequestContext};

use crate::error::{ExecutorError, TaskError};
use crate::future::{Outcome, ProgressivePromise, Promise, TaskFuture};

// ---------------------------------------------------------------------------
// ContextAwareFuture
// ---------------------------------------------------------------------------

/// A [`TaskFuture`] whose listeners run with a bound context active.
pub struct ContextAwareFuture<T> {
    context: RequestContext,
    inner: TaskFuture<T>,
}

impl<T> Clone for ContextAwareFuture<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ContextAwareFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAwareFuture")
            .field("context_id", &self.context.id())
            .field("future", &self.inner)
            .finish()
    }
}

impl<T> ContextAwareFuture<T> {
    /// Decorates `inner` so its listeners run with `context` active.
    pub fn new(context: RequestContext, inner: TaskFuture<T>) -> Self {
        Self { context, inner }
    }

    /// The context listeners will observe.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The undecorated future.
    #[must_use]
    pub fn without_context(&self) -> &TaskFuture<T> {
        &self.inner
    }

    /// Registers a completion listener, context-wrapped.
    ///
    /// No exception handler is installed: a listener failure is the
    /// underlying future's concern, exactly as without the decorator.
    pub fn add_listener<L>(&self, listener: L)
    where
        L: FnOnce(Outcome<T>) + Send + 'static,
    {
        let wrapped = ContextAwareFn::new(&self.context, listener);
        self.inner.add_listener(move |outcome| wrapped.call(outcome));
    }

    /// Whether the future has completed. Forwarded unmodified.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    /// Whether the future completed through cancellation. Forwarded
    /// unmodified.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Cancels the underlying future. Forwarded unmodified.
    pub fn cancel(&self) -> bool {
        self.inner.cancel()
    }

    /// The completion outcome, if complete. Forwarded unmodified.
    #[must_use]
    pub fn result_now(&self) -> Option<Outcome<T>> {
        self.inner.result_now()
    }
}

impl<T> std::future::Future for ContextAwareFuture<T> {
    type Output = Outcome<T>;

    // Awaiting forwards to the inner future: the continuation of an
    // `.await` belongs to the polling task, not to this layer.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().inner).poll(cx)
    }
}

// ---------------------------------------------------------------------------
// ContextAwarePromise
// ---------------------------------------------------------------------------

/// A [`Promise`] whose future side is context-aware.
///
/// Completion operations forward unmodified: completing a promise does not
/// run user code in the context.
pub struct ContextAwarePromise<T> {
    context: RequestContext,
    inner: Promise<T>,
}

impl<T> Clone for ContextAwarePromise<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ContextAwarePromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAwarePromise")
            .field("context_id", &self.context.id())
            .field("promise", &self.inner)
            .finish()
    }
}

impl<T> ContextAwarePromise<T> {
    /// Decorates `inner` with `context`.
    pub fn new(context: RequestContext, inner: Promise<T>) -> Self {
        Self { context, inner }
    }

    /// The context this promise's listeners will observe.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The undecorated promise.
    #[must_use]
    pub fn without_context(&self) -> &Promise<T> {
        &self.inner
    }

    /// The context-aware read end of this promise.
    #[must_use]
    pub fn future(&self) -> ContextAwareFuture<T> {
        ContextAwareFuture::new(self.context.clone(), self.inner.future())
    }

    /// Completes with `value`. Forwarded unmodified.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_success(&self, value: T) -> Result<(), ExecutorError> {
        self.inner.set_success(value)
    }

    /// Completes with `cause`. Forwarded unmodified.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_failure(&self, cause: TaskError) -> Result<(), ExecutorError> {
        self.inner.set_failure(cause)
    }

    /// Completes with `value` unless already complete. Forwarded unmodified.
    pub fn try_success(&self, value: T) -> bool {
        self.inner.try_success(value)
    }

    /// Completes with `cause` unless already complete. Forwarded unmodified.
    pub fn try_failure(&self, cause: TaskError) -> bool {
        self.inner.try_failure(cause)
    }
}

// ---------------------------------------------------------------------------
// ContextAwareProgressivePromise
// ---------------------------------------------------------------------------

/// A [`ProgressivePromise`] whose completion *and* progress listeners run
/// with a bound context active.
pub struct ContextAwareProgressivePromise<T> {
    context: RequestContext,
    inner: ProgressivePromise<T>,
}

impl<T> Clone for ContextAwareProgressivePromise<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ContextAwareProgressivePromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAwareProgressivePromise")
            .field("context_id", &self.context.id())
            .field("promise", &self.inner)
            .finish()
    }
}

impl<T> ContextAwareProgressivePromise<T> {
    /// Decorates `inner` with `context`.
    pub fn new(context: RequestContext, inner: ProgressivePromise<T>) -> Self {
        Self { context, inner }
    }

    /// The context this promise's listeners will observe.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The undecorated progressive promise.
    #[must_use]
    pub fn without_context(&self) -> &ProgressivePromise<T> {
        &self.inner
    }

    /// The context-aware read end of this promise.
    #[must_use]
    pub fn future(&self) -> ContextAwareFuture<T> {
        ContextAwareFuture::new(self.context.clone(), self.inner.future())
    }

    /// Registers a progress listener, context-wrapped.
    pub fn add_progress_listener<L>(&self, listener: L)
    where
        L: FnMut(u64, u64) + Send + 'static,
    {
        let mut wrapped = ContextAwareBiFn::new(&self.context, listener);
        self.inner
            .add_progress_listener(move |current, total| wrapped.call(current, total));
    }

    /// Reports progress. Forwarded unmodified; the wrapped listeners
    /// activate the context themselves.
    pub fn set_progress(&self, current: u64, total: u64) {
        self.inner.set_progress(current, total);
    }

    /// Completes with `value`. Forwarded unmodified.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_success(&self, value: T) -> Result<(), ExecutorError> {
        self.inner.set_success(value)
    }

    /// Completes with `cause`. Forwarded unmodified.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_failure(&self, cause: TaskError) -> Result<(), ExecutorError> {
        self.inner.set_failure(cause)
    }

    /// Completes with `value` unless already complete. Forwarded unmodified.
    pub fn try_success(&self, value: T) -> bool {
        self.inner.try_success(value)
    }

    /// Completes with `cause` unless already complete. Forwarded unmodified.
    pub fn try_failure(&self, cause: TaskError) -> bool {
        self.inner.try_failure(cause)
    }
}
