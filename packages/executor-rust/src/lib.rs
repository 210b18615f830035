//! `ctxflow` Executor — single-consumer event loop, listener-based futures,
//! and context-aware facades over both.

pub mod context_event_loop;
pub mod context_future;
pub mod error;
pub mod event_loop;
pub mod future;

pub use context_event_loop::ContextAwareEventLoop;
pub use context_future::{
    ContextAwareFuture, ContextAwareProgressivePromise, ContextAwarePromise,
};
pub use error::{ExecutorError, TaskError};
pub use event_loop::{EventLoop, EventLoopGroup};
pub use future::{Outcome, ProgressivePromise, Promise, TaskFuture};
