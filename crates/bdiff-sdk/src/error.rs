use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("line splitting failed: {0}")]
    Lines(#[from] bdiff_lines::LinesError),

    #[error("diff failed: {0}")]
    Diff(#[from] bdiff_diff::DiffError),

    #[error("patch failed: {0}")]
    Patch(#[from] bdiff_patch::PatchError),
}

impl SdkError {
    /// Returns `true` for allocation failures at any layer.
    pub fn is_resource_exhausted(&self) -> bool {
        match self {
            Self::Lines(bdiff_lines::LinesError::ResourceExhausted { .. }) => true,
            Self::Diff(e) => e.is_resource_exhausted(),
            Self::Patch(e) => e.is_resource_exhausted(),
        }
    }

    /// Returns `true` if a patch buffer was malformed.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Patch(e) if e.is_format_error())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
