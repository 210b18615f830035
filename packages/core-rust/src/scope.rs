//! Thread-ambient context slot with scoped push/pop.
//!
//! Each thread carries a single slot holding the currently active
//! [`RequestContext`]. Activation replaces the slot and returns a
//! [`ContextScope`] restore token; dropping the token puts back whatever
//! was active immediately before, so activations nest LIFO per thread.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::context::RequestContext;

thread_local! {
    static CURRENT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
}

/// Returns the context active on the calling thread, if any.
#[must_use]
pub fn current_context() -> Option<RequestContext> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Installs `context` as the calling thread's active context.
///
/// Internal entry point backing [`RequestContext::push`].
pub(crate) fn enter(context: &RequestContext) -> ContextScope {
    let previous = CURRENT.with(|slot| slot.replace(Some(context.clone())));
    ContextScope {
        installed: context.clone(),
        previous,
        _not_send: PhantomData,
    }
}

/// Restore token produced by activating a context.
///
/// Restores the previously active context (possibly none) exactly once,
/// when dropped. Drop runs during panic unwinding as well, so restoration
/// holds on every exit path of the activating frame.
///
/// The token is `!Send`: it must be released on the thread that created it,
/// within the dynamic extent of the wrapped call.
#[derive(Debug)]
pub struct ContextScope {
    installed: RequestContext,
    previous: Option<RequestContext>,
    // Raw-pointer marker keeps the guard on its creating thread.
    _not_send: PhantomData<*const ()>,
}

impl ContextScope {
    /// The context this scope installed.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.installed
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        CURRENT.with(|slot| {
            let mut slot = slot.borrow_mut();
            // LIFO release is the contract; out-of-order release still
            // restores this scope's saved predecessor so the slot never
            // ends up holding a stale context indefinitely.
            if slot.as_ref() != Some(&self.installed) {
                tracing::warn!(
                    context_id = self.installed.id(),
                    "context scope released out of order"
                );
            }
            *slot = self.previous.take();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(trace: &str) -> RequestContext {
        RequestContext::new(trace).unwrap()
    }

    #[test]
    fn no_context_by_default() {
        assert!(current_context().is_none());
    }

    #[test]
    fn push_installs_and_drop_restores() {
        let c = ctx("t-1");
        {
            let _scope = c.push();
            assert_eq!(current_context().as_ref(), Some(&c));
        }
        assert!(current_context().is_none());
    }

    #[test]
    fn nested_push_of_different_contexts_stacks_cleanly() {
        let outer = ctx("t-outer");
        let inner = ctx("t-inner");

        let _outer_scope = outer.push();
        {
            let _inner_scope = inner.push();
            assert_eq!(current_context().as_ref(), Some(&inner));
        }
        // Inner release restores exactly the outer context, not none.
        assert_eq!(current_context().as_ref(), Some(&outer));
    }

    #[test]
    fn reentrant_push_of_same_context_is_allowed() {
        let c = ctx("t-same");
        let _s1 = c.push();
        {
            let _s2 = c.push();
            assert_eq!(current_context().as_ref(), Some(&c));
        }
        assert_eq!(current_context().as_ref(), Some(&c));
    }

    #[test]
    fn restores_on_panic() {
        let c = ctx("t-panic");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = c.push();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(current_context().is_none());
    }

    #[test]
    fn contexts_on_other_threads_are_independent() {
        let c = ctx("t-main");
        let _scope = c.push();

        let seen = std::thread::spawn(current_context).join().unwrap();
        assert!(seen.is_none());
        assert_eq!(current_context().as_ref(), Some(&c));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Any nesting depth of distinct contexts restores the exact
            /// predecessor at every level on the way back out.
            #[test]
            fn lifo_restoration_at_every_depth(depth in 1usize..16) {
                let contexts: Vec<_> =
                    (0..depth).map(|i| ctx(&format!("t-{i}"))).collect();

                fn descend(contexts: &[RequestContext]) {
                    let Some((head, rest)) = contexts.split_first() else {
                        return;
                    };
                    let _scope = head.push();
                    assert_eq!(current_context().as_ref(), Some(head));
                    descend(rest);
                    assert_eq!(current_context().as_ref(), Some(head));
                }

                descend(&contexts);
                prop_assert!(current_context().is_none());
            }
        }
    }
}
