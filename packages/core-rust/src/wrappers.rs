//! Context-aware callable wrappers.
//!
//! A closed set of adapters, selected at construction time by arity and by
//! presence of a fallback handler. Each wrapper activates its context
//! before invoking the underlying callable and restores the previous
//! ambient state on every exit path (return, error, panic) via the scope
//! guard. Wrappers perform no I/O and have no side effects beyond the
//! ambient slot and whatever the callable itself does.

use crate::context::RequestContext;

// ---------------------------------------------------------------------------
// Arity 0
// ---------------------------------------------------------------------------

/// One-shot zero-argument callable bound to a context.
///
/// The unit that crosses a scheduling boundary: the executor facade wraps
/// every submitted task in one of these before delegating.
#[derive(Debug)]
pub struct ContextAwareTask<F> {
    context: RequestContext,
    inner: F,
}

impl<F> ContextAwareTask<F> {
    /// Binds `task` to `context`.
    pub fn new(context: &RequestContext, task: F) -> Self {
        Self {
            context: context.clone(),
            inner: task,
        }
    }

    /// The context this task is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original, unwrapped callable.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F, R> ContextAwareTask<F>
where
    F: FnOnce() -> R,
{
    /// Runs the task with the context active.
    pub fn call(self) -> R {
        let _scope = self.context.push();
        (self.inner)()
    }
}

/// Reusable zero-argument callable bound to a context, for periodic
/// scheduling: every invocation activates and deactivates the context.
#[derive(Debug)]
pub struct ContextAwarePeriodicTask<F> {
    context: RequestContext,
    inner: F,
}

impl<F> ContextAwarePeriodicTask<F> {
    /// Binds `task` to `context`.
    pub fn new(context: &RequestContext, task: F) -> Self {
        Self {
            context: context.clone(),
            inner: task,
        }
    }

    /// The context this task is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original, unwrapped callable.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> ContextAwarePeriodicTask<F>
where
    F: FnMut(),
{
    /// Runs one tick of the task with the context active.
    pub fn run(&mut self) {
        let _scope = self.context.push();
        (self.inner)();
    }
}

// ---------------------------------------------------------------------------
// Arity 1
// ---------------------------------------------------------------------------

/// One-argument callable bound to a context.
///
/// Also the shape of a future listener: the argument is the completion
/// outcome delivered by the underlying future.
#[derive(Debug)]
pub struct ContextAwareFn<F> {
    context: RequestContext,
    inner: F,
}

impl<F> ContextAwareFn<F> {
    /// Binds `func` to `context`.
    pub fn new(context: &RequestContext, func: F) -> Self {
        Self {
            context: context.clone(),
            inner: func,
        }
    }

    /// The context this callable is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original, unwrapped callable.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> ContextAwareFn<F> {
    /// Invokes the callable with the context active.
    pub fn call<T, R>(self, arg: T) -> R
    where
        F: FnOnce(T) -> R,
    {
        let _scope = self.context.push();
        (self.inner)(arg)
    }
}

/// One-argument fallible callable with an error-to-result fallback.
///
/// The callable runs with the context active; the handler, if reached,
/// runs *after* the scope has been released (contextless apply). With a
/// handler present no failure escapes the wrapper.
#[derive(Debug)]
pub struct ContextAwareFallibleFn<F, H> {
    context: RequestContext,
    inner: F,
    handler: H,
}

impl<F, H> ContextAwareFallibleFn<F, H> {
    /// Binds `func` and its fallback `handler` to `context`.
    pub fn new(context: &RequestContext, func: F, handler: H) -> Self {
        Self {
            context: context.clone(),
            inner: func,
            handler,
        }
    }

    /// The context this callable is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original callable and handler.
    pub fn into_parts(self) -> (F, H) {
        (self.inner, self.handler)
    }

    /// Invokes the callable with the context active, converting an `Err`
    /// into a substitute result through the handler.
    pub fn call<T, R, E>(self, arg: T) -> R
    where
        F: FnOnce(T) -> Result<R, E>,
        H: FnOnce(E) -> R,
    {
        let outcome = {
            let _scope = self.context.push();
            (self.inner)(arg)
        };
        outcome.unwrap_or_else(self.handler)
    }
}

// ---------------------------------------------------------------------------
// Arity 2
// ---------------------------------------------------------------------------

/// Two-argument callable bound to a context.
///
/// Reusable (`FnMut`): progress listeners are invoked once per progress
/// update through the same wrapper instance.
#[derive(Debug)]
pub struct ContextAwareBiFn<F> {
    context: RequestContext,
    inner: F,
}

impl<F> ContextAwareBiFn<F> {
    /// Binds `func` to `context`.
    pub fn new(context: &RequestContext, func: F) -> Self {
        Self {
            context: context.clone(),
            inner: func,
        }
    }

    /// The context this callable is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original, unwrapped callable.
    pub fn into_inner(self) -> F {
        self.inner
    }

    /// Invokes the callable with the context active.
    pub fn call<T, U, R>(&mut self, first: T, second: U) -> R
    where
        F: FnMut(T, U) -> R,
    {
        let _scope = self.context.push();
        (self.inner)(first, second)
    }
}

/// Two-argument fallible callable with an error-to-result fallback.
///
/// Same contract as [`ContextAwareFallibleFn`]: the handler runs after the
/// scope has been released, and with a handler present no failure escapes.
#[derive(Debug)]
pub struct ContextAwareFallibleBiFn<F, H> {
    context: RequestContext,
    inner: F,
    handler: H,
}

impl<F, H> ContextAwareFallibleBiFn<F, H> {
    /// Binds `func` and its fallback `handler` to `context`.
    pub fn new(context: &RequestContext, func: F, handler: H) -> Self {
        Self {
            context: context.clone(),
            inner: func,
            handler,
        }
    }

    /// The context this callable is bound to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Recovers the original callable and handler.
    pub fn into_parts(self) -> (F, H) {
        (self.inner, self.handler)
    }

    /// Invokes the callable with the context active, converting an `Err`
    /// into a substitute result through the handler.
    pub fn call<T, U, R, E>(self, first: T, second: U) -> R
    where
        F: FnOnce(T, U) -> Result<R, E>,
        H: FnOnce(E) -> R,
    {
        let outcome = {
            let _scope = self.context.push();
            (self.inner)(first, second)
        };
        outcome.unwrap_or_else(self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::current_context;

    fn ctx(trace: &str) -> RequestContext {
        RequestContext::new(trace).unwrap()
    }

    #[test]
    fn task_runs_with_context_active_and_restores() {
        let c = ctx("w-task");
        let bound = c.clone();
        let task = c.wrap_task(move || {
            assert_eq!(current_context().as_ref(), Some(&bound));
            7
        });

        assert!(current_context().is_none());
        assert_eq!(task.call(), 7);
        assert!(current_context().is_none());
    }

    #[test]
    fn task_restores_ambient_state_on_panic() {
        let c = ctx("w-panic");
        let task = c.wrap_task(|| panic!("task failed"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| task.call()));
        assert!(result.is_err());
        assert!(current_context().is_none());
    }

    #[test]
    fn fn_doubles_five_to_ten_without_touching_ambient_state() {
        let c = ctx("w-double");
        let wrapped = c.wrap_fn(|x: i32| x * 2);

        assert_eq!(wrapped.call(5), 10);
        assert!(current_context().is_none());
    }

    #[test]
    fn fn_observes_exactly_the_bound_context() {
        let outer = ctx("w-outer");
        let bound = ctx("w-bound");
        let expected = bound.clone();

        let _outer_scope = outer.push();
        let wrapped = bound.wrap_fn(move |x: u32| {
            assert_eq!(current_context().as_ref(), Some(&expected));
            x + 1
        });
        assert_eq!(wrapped.call(1), 2);
        // Back to the caller's ambient state, not none.
        assert_eq!(current_context().as_ref(), Some(&outer));
    }

    #[test]
    fn fallible_fn_handler_converts_failure_to_substitute_result() {
        let c = ctx("w-div");
        let wrapped = c.wrap_fn_or_else(
            |x: i32| {
                if x == 0 {
                    Err("divide by zero")
                } else {
                    Ok(10 / x)
                }
            },
            |_e| -1,
        );

        assert_eq!(wrapped.call(0), -1);
        assert!(current_context().is_none());
    }

    #[test]
    fn fallible_fn_handler_runs_outside_the_context() {
        let c = ctx("w-ctxless");
        let wrapped = c.wrap_fn_or_else(
            |_x: i32| Err::<i32, &str>("boom"),
            |_e| {
                assert!(current_context().is_none());
                -1
            },
        );
        assert_eq!(wrapped.call(3), -1);
    }

    #[test]
    fn err_propagates_verbatim_without_handler() {
        let c = ctx("w-err");
        let wrapped = c.wrap_fn(|_x: i32| Err::<i32, &str>("divide by zero"));

        assert_eq!(wrapped.call(0), Err("divide by zero"));
        assert!(current_context().is_none());
    }

    #[test]
    fn bi_fn_is_reusable_and_context_active_each_call() {
        let c = ctx("w-bifn");
        let bound = c.clone();
        let mut wrapped = c.wrap_bi_fn(move |a: u64, b: u64| {
            assert_eq!(current_context().as_ref(), Some(&bound));
            a + b
        });

        assert_eq!(wrapped.call(1, 2), 3);
        assert_eq!(wrapped.call(10, 20), 30);
        assert!(current_context().is_none());
    }

    #[test]
    fn fallible_bi_fn_recovers_through_handler() {
        let c = ctx("w-bifall");
        let wrapped = c.wrap_bi_fn_or_else(
            |a: i64, b: i64| {
                if b == 0 {
                    Err("divide by zero")
                } else {
                    Ok(a / b)
                }
            },
            |_e| -1,
        );
        assert_eq!(wrapped.call(8, 0), -1);
    }

    #[test]
    fn periodic_task_activates_on_every_tick() {
        let c = ctx("w-periodic");
        let bound = c.clone();
        let mut ticks = 0;
        let mut task = c.wrap_periodic(|| {
            assert_eq!(current_context().as_ref(), Some(&bound));
            ticks += 1;
        });

        task.run();
        task.run();
        task.run();
        drop(task);
        assert_eq!(ticks, 3);
        assert!(current_context().is_none());
    }

    #[test]
    fn wrapper_exposes_context_and_original_callable() {
        let c = ctx("w-introspect");
        let task = c.wrap_task(|| 42);

        assert_eq!(task.context(), &c);
        let original = task.into_inner();
        // Invoking the recovered callable does not touch ambient state.
        assert_eq!(original(), 42);
        assert!(current_context().is_none());
    }
}
