//! Error types for the diff crate.

use std::collections::TryReserveError;

use bdiff_lines::LinesError;

/// Errors that can occur while aligning two line sequences.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Splitting or normalizing an input buffer failed.
    #[error(transparent)]
    Lines(#[from] LinesError),

    /// An intermediate table (line index, run table, work stack, hunk list)
    /// could not be allocated.
    #[error("out of memory while {context}: {source}")]
    ResourceExhausted {
        context: &'static str,
        source: TryReserveError,
    },

    /// The matcher produced a result that breaks its own invariants.
    #[error("matcher invariant violated: {0}")]
    Internal(String),
}

impl DiffError {
    pub(crate) fn exhausted(context: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::ResourceExhausted { context, source }
    }

    /// Returns `true` if the failure was an allocation failure at any layer.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(
            self,
            Self::ResourceExhausted { .. } | Self::Lines(LinesError::ResourceExhausted { .. })
        )
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
