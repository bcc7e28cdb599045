use bdiff_diff::{diff_buffers, DiffOptions, DiffStats, Hunk, MatchingBlock};

use crate::error::SdkResult;

/// Diff/patch engine bound to a set of matching options.
///
/// Holds no state between calls; one engine can be shared freely across
/// threads.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    options: DiffOptions,
}

impl Engine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Changed line ranges between `old` and `new`.
    pub fn hunks(&self, old: &[u8], new: &[u8]) -> SdkResult<Vec<Hunk>> {
        Ok(diff_buffers(old, new, &self.options)?.hunks)
    }

    /// Unchanged runs between `old` and `new`, with the terminating sentinel.
    pub fn blocks(&self, old: &[u8], new: &[u8]) -> SdkResult<Vec<MatchingBlock>> {
        Ok(diff_buffers(old, new, &self.options)?.into_blocks_with_sentinel()?)
    }

    pub fn stats(&self, old: &[u8], new: &[u8]) -> SdkResult<DiffStats> {
        Ok(diff_buffers(old, new, &self.options)?.stats())
    }

    /// The binary patch turning `old` into `new`.
    ///
    /// Always byte-exact: whitespace options do not apply, since the patch
    /// has to reproduce `new` precisely.
    pub fn patch(&self, old: &[u8], new: &[u8]) -> SdkResult<Vec<u8>> {
        Ok(bdiff_patch::diff_patch(old, new)?)
    }

    pub fn apply(&self, base: &[u8], patch: &[u8]) -> SdkResult<Vec<u8>> {
        Ok(bdiff_patch::apply(base, patch)?)
    }

    pub fn apply_chain<I>(&self, base: &[u8], patches: I) -> SdkResult<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Ok(bdiff_patch::apply_chain(base, patches)?)
    }
}
