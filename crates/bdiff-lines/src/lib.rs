//! Line splitting for bdiff.
//!
//! Partitions a raw byte buffer into line records without copying bytes.
//! Every record carries a content hash used by the matcher to screen
//! candidate lines before comparing bytes.
//!
//! # Key Types
//!
//! - [`Line`] -- Byte range of one line plus its hash
//! - [`LineSequence`] -- All lines of one buffer, borrowing the buffer
//! - [`WhitespaceMode`] -- Whitespace handling applied before matching

pub mod error;
pub mod line;
pub mod whitespace;

pub use error::{LinesError, LinesResult};
pub use line::{line_hash, split_lines, Line, LineSequence};
pub use whitespace::{normalize_whitespace, WhitespaceMode};
