//! Error types for the line splitter.

use std::collections::TryReserveError;

/// Errors that can occur while splitting or normalizing a buffer.
#[derive(Debug, thiserror::Error)]
pub enum LinesError {
    /// Memory for the line table (or a normalized copy) could not be reserved.
    #[error("out of memory while {context}: {source}")]
    ResourceExhausted {
        context: &'static str,
        source: TryReserveError,
    },
}

impl LinesError {
    pub(crate) fn exhausted(context: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::ResourceExhausted { context, source }
    }
}

/// Convenience alias for line-splitting results.
pub type LinesResult<T> = Result<T, LinesError>;
