//! Context-aware facade over [`EventLoop`].
//!
//! Presents the same surface as the underlying loop. Every entry point
//! that accepts a task wraps it with a context-aware wrapper before
//! delegating; factory methods return context-aware future/promise
//! decorators; pure queries and lifecycle operations forward unmodified.
//! The facade holds only the context and a loop handle, so it is freely
//! clonable and shareable across threads.

use std::time::Duration;

use ctxflow_core::RequestContext;

use crate::context_future::{
    ContextAwareFuture, ContextAwareProgressivePromise, ContextAwarePromise,
};
use crate::error::{ExecutorError, TaskError};
use crate::event_loop::{EventLoop, EventLoopGroup};
use crate::future::TaskFuture;

/// An [`EventLoop`] facade bound to a [`RequestContext`].
#[derive(Debug, Clone)]
pub struct ContextAwareEventLoop {
    context: RequestContext,
    inner: EventLoop,
}

impl ContextAwareEventLoop {
    /// Binds `event_loop` to `context`.
    pub fn new(context: RequestContext, event_loop: EventLoop) -> Self {
        Self {
            context,
            inner: event_loop,
        }
    }

    /// The context every task submitted through this facade runs under.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The undecorated loop.
    #[must_use]
    pub fn without_context(&self) -> &EventLoop {
        &self.inner
    }

    /// Submits a fire-and-forget task, context-wrapped.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn execute<F>(&self, task: F) -> Result<(), ExecutorError>
    where
        F: FnOnce() + Send + 'static,
    {
        let wrapped = self.context.wrap_task(task);
        self.inner.execute(move || wrapped.call())
    }

    /// Submits a task, context-wrapped, and returns the underlying typed
    /// future unchanged.
    ///
    /// No exception handler is installed: a task failure surfaces through
    /// the returned future exactly as it would without the facade.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn submit<F, R>(&self, task: F) -> Result<TaskFuture<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + Sync + 'static,
    {
        let wrapped = self.context.wrap_task(task);
        self.inner.submit(move || wrapped.call())
    }

    /// Schedules a task after `delay`, context-wrapped.
    ///
    /// Cancelling the returned future before the task has started
    /// guarantees the context is never activated for it.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule<F, R>(&self, task: F, delay: Duration) -> Result<TaskFuture<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + Sync + 'static,
    {
        let wrapped = self.context.wrap_task(task);
        self.inner.schedule(move || wrapped.call(), delay)
    }

    /// Periodic scheduling at a fixed rate; every tick runs context-wrapped.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::InvalidArgument`] for a zero `period`;
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule_at_fixed_rate<F>(
        &self,
        task: F,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<TaskFuture<()>, ExecutorError>
    where
        F: FnMut() + Send + 'static,
    {
        let mut wrapped = self.context.wrap_periodic(task);
        self.inner
            .schedule_at_fixed_rate(move || wrapped.run(), initial_delay, period)
    }

    /// Periodic scheduling with a fixed delay between runs; every tick runs
    /// context-wrapped.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::InvalidArgument`] for a zero `delay`;
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule_with_fixed_delay<F>(
        &self,
        task: F,
        initial_delay: Duration,
        delay: Duration,
    ) -> Result<TaskFuture<()>, ExecutorError>
    where
        F: FnMut() + Send + 'static,
    {
        let mut wrapped = self.context.wrap_periodic(task);
        self.inner
            .schedule_with_fixed_delay(move || wrapped.run(), initial_delay, delay)
    }

    /// A pending promise whose listeners run with the bound context.
    #[must_use]
    pub fn new_promise<T>(&self) -> ContextAwarePromise<T> {
        ContextAwarePromise::new(self.context.clone(), self.inner.new_promise())
    }

    /// A pending progressive promise whose completion and progress
    /// listeners run with the bound context.
    #[must_use]
    pub fn new_progressive_promise<T>(&self) -> ContextAwareProgressivePromise<T> {
        ContextAwareProgressivePromise::new(
            self.context.clone(),
            self.inner.new_progressive_promise(),
        )
    }

    /// An already-succeeded future whose listeners run with the bound
    /// context.
    #[must_use]
    pub fn new_succeeded_future<T>(&self, value: T) -> ContextAwareFuture<T> {
        ContextAwareFuture::new(self.context.clone(), self.inner.new_succeeded_future(value))
    }

    /// An already-failed future whose listeners run with the bound context.
    #[must_use]
    pub fn new_failed_future<T>(&self, cause: TaskError) -> ContextAwareFuture<T> {
        ContextAwareFuture::new(self.context.clone(), self.inner.new_failed_future(cause))
    }

    /// Whether the calling code is running as a task on the underlying
    /// loop. Forwarded unmodified.
    #[must_use]
    pub fn in_event_loop(&self) -> bool {
        self.inner.in_event_loop()
    }

    /// Whether the underlying loop is shutting down. Forwarded unmodified.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.inner.is_shutting_down()
    }

    /// Shuts down the underlying loop. Forwarded unmodified.
    pub fn shutdown_gracefully(&self) -> TaskFuture<()> {
        self.inner.shutdown_gracefully()
    }

    /// The underlying loop's termination future. Forwarded unmodified.
    #[must_use]
    pub fn termination_future(&self) -> TaskFuture<()> {
        self.inner.termination_future()
    }

    /// The underlying loop's group, if any. Forwarded unmodified.
    #[must_use]
    pub fn parent(&self) -> Option<EventLoopGroup> {
        self.inner.parent()
    }

    /// The underlying loop's name. Forwarded unmodified.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }
}
