//! Hunk matcher for bdiff.
//!
//! Aligns the lines of two buffers and reports the changed regions as
//! `(a1, a2, b1, b2)` hunks, or the unchanged regions as matching blocks.
//!
//! # Key Types
//!
//! - [`Hunk`] -- Replaced line range pair
//! - [`MatchingBlock`] -- Run of identical lines
//! - [`LineDiff`] -- Full alignment: hunks, blocks, and line counts
//! - [`DiffOptions`] -- Whitespace handling for comparisons

pub mod blob_diff;
pub mod error;
pub mod hunk;
pub mod matcher;
pub mod options;

pub use blob_diff::{diff_buffers, diff_hunks, diff_hunks_with, matching_blocks, matching_blocks_with};
pub use error::{DiffError, DiffResult};
pub use hunk::{DiffStats, Hunk, MatchingBlock};
pub use matcher::{align, align_with, diff, LineDiff};
pub use options::DiffOptions;
