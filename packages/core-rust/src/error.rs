//! Error types for context construction and wrapper validation.

/// Errors raised synchronously when building a context or a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// A constructor argument failed validation before any invocation occurred.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
