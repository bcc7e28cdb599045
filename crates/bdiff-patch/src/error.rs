use std::collections::TryReserveError;

use bdiff_diff::{DiffError, Hunk};
use bdiff_lines::LinesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("truncated patch record at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("negative {field} ({value}) in patch record at offset {offset}")]
    NegativeField {
        offset: usize,
        field: &'static str,
        value: i32,
    },

    #[error("patch record at offset {offset} has start {start} after end {end}")]
    InvertedRange {
        offset: usize,
        start: usize,
        end: usize,
    },

    #[error("patch record at offset {offset} replaces {start}..{end} past the base length {base_len}")]
    OutOfBounds {
        offset: usize,
        start: usize,
        end: usize,
        base_len: usize,
    },

    #[error("patch record at offset {offset} starts at {start}, before the previous record's end {previous_end}")]
    NonMonotonic {
        offset: usize,
        start: usize,
        previous_end: usize,
    },

    #[error("{field} {value} does not fit in a 32-bit patch field")]
    ValueOverflow { field: &'static str, value: usize },

    #[error("hunk {hunk:?} lies outside buffers of {old_lines} and {new_lines} lines")]
    HunkOutOfRange {
        hunk: Hunk,
        old_lines: usize,
        new_lines: usize,
    },

    #[error("patch {index} in chain: {source}")]
    Chain {
        index: usize,
        source: Box<PatchError>,
    },

    #[error("out of memory while {context}: {source}")]
    ResourceExhausted {
        context: &'static str,
        source: TryReserveError,
    },

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Lines(#[from] LinesError),
}

impl PatchError {
    pub(crate) fn exhausted(context: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::ResourceExhausted { context, source }
    }

    /// Returns `true` if the patch bytes themselves are malformed, as opposed
    /// to an encoding problem or an allocation failure.
    pub fn is_format_error(&self) -> bool {
        match self {
            Self::Truncated { .. }
            | Self::NegativeField { .. }
            | Self::InvertedRange { .. }
            | Self::OutOfBounds { .. }
            | Self::NonMonotonic { .. } => true,
            Self::Chain { source, .. } => source.is_format_error(),
            _ => false,
        }
    }

    pub fn is_resource_exhausted(&self) -> bool {
        match self {
            Self::ResourceExhausted { .. } | Self::Lines(LinesError::ResourceExhausted { .. }) => {
                true
            }
            Self::Diff(e) => e.is_resource_exhausted(),
            Self::Chain { source, .. } => source.is_resource_exhausted(),
            _ => false,
        }
    }
}

pub type PatchResult<T> = Result<T, PatchError>;
