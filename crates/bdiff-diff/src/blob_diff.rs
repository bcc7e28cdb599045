//! Buffer-level entry points: split both buffers and align their lines.

use bdiff_lines::split_lines;

use crate::error::DiffResult;
use crate::hunk::{Hunk, MatchingBlock};
use crate::matcher::{align_with, LineDiff};
use crate::options::DiffOptions;

/// Split and align two buffers under `options`.
pub fn diff_buffers(old: &[u8], new: &[u8], options: &DiffOptions) -> DiffResult<LineDiff> {
    let old_lines = split_lines(old)?;
    let new_lines = split_lines(new)?;
    align_with(&old_lines, &new_lines, options)
}

/// The hunks that turn `old` into `new`, comparing lines byte for byte.
pub fn diff_hunks(old: &[u8], new: &[u8]) -> DiffResult<Vec<Hunk>> {
    diff_hunks_with(old, new, &DiffOptions::default())
}

/// The hunks that turn `old` into `new` under `options`.
pub fn diff_hunks_with(old: &[u8], new: &[u8], options: &DiffOptions) -> DiffResult<Vec<Hunk>> {
    Ok(diff_buffers(old, new, options)?.hunks)
}

/// The unchanged runs between `old` and `new`, ending with the
/// `(old_lines, new_lines, 0)` sentinel.
pub fn matching_blocks(old: &[u8], new: &[u8]) -> DiffResult<Vec<MatchingBlock>> {
    matching_blocks_with(old, new, &DiffOptions::default())
}

pub fn matching_blocks_with(
    old: &[u8],
    new: &[u8],
    options: &DiffOptions,
) -> DiffResult<Vec<MatchingBlock>> {
    diff_buffers(old, new, options)?.into_blocks_with_sentinel()
}
