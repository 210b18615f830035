//! `ctxflow` Core — request context, scoped activation, and context-aware callable wrappers.

pub mod context;
pub mod error;
pub mod scope;
pub mod wrappers;

pub use context::RequestContext;
pub use error::ContextError;
pub use scope::{current_context, ContextScope};
pub use wrappers::{
    ContextAwareBiFn, ContextAwareFallibleBiFn, ContextAwareFallibleFn, ContextAwareFn,
    ContextAwarePeriodicTask, ContextAwareTask,
};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
