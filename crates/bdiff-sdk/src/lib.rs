//! High-level API for bdiff.
//!
//! The four core operations are re-exported here under one roof:
//!
//! - [`split_lines`] -- buffer to line records
//! - [`diff_hunks`] -- changed line ranges between two buffers
//! - [`diff_patch`] -- binary patch turning one buffer into another
//! - [`apply_patch`] -- inverse of [`diff_patch`]
//!
//! [`Engine`] bundles them with matching options for applications that
//! want a single entry point and a single error type.

pub mod engine;
pub mod error;

pub use engine::Engine;
pub use error::{SdkError, SdkResult};

pub use bdiff_diff::{
    diff_hunks, diff_hunks_with, matching_blocks, matching_blocks_with, DiffError, DiffOptions,
    DiffStats, Hunk, MatchingBlock,
};
pub use bdiff_lines::{split_lines, Line, LineSequence, LinesError, WhitespaceMode};
pub use bdiff_patch::{
    apply as apply_patch, apply_chain, diff_patch, patched_size, PatchError, PatchReader,
    PatchRecord,
};
