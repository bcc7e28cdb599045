//! Hunks, matching blocks, and summary statistics.

use serde::{Deserialize, Serialize};

/// A replaced region: old lines `[old_start, old_end)` become new lines
/// `[new_start, new_end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Hunk {
    /// Build a hunk from `(a1, a2, b1, b2)` line indices.
    pub fn new(old_start: usize, old_end: usize, new_start: usize, new_end: usize) -> Self {
        Self {
            old_start,
            old_end,
            new_start,
            new_end,
        }
    }

    /// The hunk as an `(a1, a2, b1, b2)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.old_start, self.old_end, self.new_start, self.new_end)
    }

    /// Number of old lines removed.
    pub fn old_len(&self) -> usize {
        self.old_end - self.old_start
    }

    /// Number of new lines inserted.
    pub fn new_len(&self) -> usize {
        self.new_end - self.new_start
    }

    /// Nothing removed, only lines inserted.
    pub fn is_insertion(&self) -> bool {
        self.old_start == self.old_end && self.new_start < self.new_end
    }

    /// Nothing inserted, only lines removed.
    pub fn is_deletion(&self) -> bool {
        self.new_start == self.new_end && self.old_start < self.old_end
    }

    /// Both sides empty; such a hunk changes nothing.
    pub fn is_noop(&self) -> bool {
        self.old_start == self.old_end && self.new_start == self.new_end
    }
}

/// A run of `len` identical lines starting at `old_start` / `new_start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchingBlock {
    pub old_start: usize,
    pub new_start: usize,
    pub len: usize,
}

impl MatchingBlock {
    /// The zero-length block that terminates a block list.
    pub fn sentinel(old_len: usize, new_len: usize) -> Self {
        Self {
            old_start: old_len,
            new_start: new_len,
            len: 0,
        }
    }

    pub fn old_end(&self) -> usize {
        self.old_start + self.len
    }

    pub fn new_end(&self) -> usize {
        self.new_start + self.len
    }
}

/// Line counts summarizing a hunk list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub hunks: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DiffStats {
    pub fn from_hunks(hunks: &[Hunk]) -> Self {
        hunks.iter().fold(
            Self {
                hunks: hunks.len(),
                ..Self::default()
            },
            |acc, h| Self {
                lines_added: acc.lines_added + h.new_len(),
                lines_removed: acc.lines_removed + h.old_len(),
                ..acc
            },
        )
    }
}
