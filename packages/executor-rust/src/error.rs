//! Error types for the event loop and its futures.

/// Synchronous errors from scheduler and promise entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// An argument failed validation before any task was accepted.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The event loop is shutting down (or already terminated) and no
    /// longer accepts tasks.
    #[error("task rejected: event loop is shutting down")]
    Rejected,
    /// The promise was already completed.
    #[error("promise already completed")]
    AlreadyComplete,
}

/// The failure channel of a [`TaskFuture`](crate::future::TaskFuture).
///
/// This layer never generates these on its own behalf except `Cancelled`
/// (from an explicit `cancel()`) and `Panicked` (a task that unwound).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// The task (or promise completer) reported a failure.
    #[error("task failed: {0}")]
    Failed(String),
    /// The future was cancelled before completion.
    #[error("task was cancelled")]
    Cancelled,
    /// The task panicked while running on the event loop.
    #[error("task panicked: {0}")]
    Panicked(String),
}
