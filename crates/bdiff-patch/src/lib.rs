//! Binary patch codec for bdiff.
//!
//! A patch is a bare concatenation of records, each a 12-byte big-endian
//! header `(start, end, len)` followed by `len` replacement bytes. There is
//! no overall header, length prefix, or checksum; a reader consumes records
//! until the input is exhausted. An empty patch means "no change".
//!
//! # Key Types
//!
//! - [`PatchWriter`] -- Record-by-record patch builder
//! - [`PatchReader`] -- Zero-copy record iterator
//! - [`RecordHeader`] / [`PatchRecord`] -- Wire header and decoded record

pub mod apply;
pub mod error;
pub mod reader;
pub mod record;
pub mod writer;

pub use apply::{apply, apply_chain};
pub use error::{PatchError, PatchResult};
pub use reader::{patched_size, PatchReader};
pub use record::{PatchRecord, RecordHeader, HEADER_SIZE};
pub use writer::{diff_patch, encode, PatchWriter};
