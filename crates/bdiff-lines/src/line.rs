//! Line records and the forward-scanning splitter.

use std::hash::Hasher;
use std::ops::Range;

use rustc_hash::FxHasher;

use crate::error::{LinesError, LinesResult};

/// A half-open byte range `[start, end)` of one line, with a content hash.
///
/// The range includes the terminating `\n` when there is one. The hash
/// covers the length and the bytes, so two lines with equal hashes are
/// *probably* equal; callers must still compare bytes to be sure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset one past the last byte of the line.
    pub end: usize,
    /// Hash of `end - start` followed by the line bytes.
    pub hash: u64,
}

impl Line {
    /// Length of the line in bytes, terminator included.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length line (never produced by the splitter).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The byte range of this line within its buffer.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` if the line ends with `\n` in `buf`.
    pub fn is_terminated(&self, buf: &[u8]) -> bool {
        self.end > self.start && buf[self.end - 1] == b'\n'
    }
}

/// Hash a line's content the way the splitter does.
pub fn line_hash(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_usize(bytes.len());
    hasher.write(bytes);
    hasher.finish()
}

/// The ordered lines of one buffer.
///
/// Borrows the buffer it was split from; lines are gap-free and cover the
/// whole buffer, so concatenating them yields the buffer again.
#[derive(Clone, Debug)]
pub struct LineSequence<'a> {
    buf: &'a [u8],
    lines: Vec<Line>,
}

impl<'a> LineSequence<'a> {
    /// The buffer these lines were split from.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the buffer was empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All line records, in order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The line record at `index`.
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// The bytes of line `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn line_bytes(&self, index: usize) -> &'a [u8] {
        &self.buf[self.lines[index].range()]
    }

    /// Iterate over the bytes of each line.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        let buf = self.buf;
        self.lines.iter().map(move |line| &buf[line.range()])
    }

    /// Byte offset where line `index` starts.
    ///
    /// `index == len()` maps to the end of the buffer, so a range of lines
    /// `[lo, hi)` always has a byte range `offset_of(lo)..offset_of(hi)`.
    /// Returns `None` past that.
    pub fn offset_of(&self, index: usize) -> Option<usize> {
        match self.lines.get(index) {
            Some(line) => Some(line.start),
            None if index == self.lines.len() => Some(self.buf.len()),
            None => None,
        }
    }

    /// The contiguous bytes of lines `[lo, hi)`.
    pub fn span(&self, lo: usize, hi: usize) -> Option<&'a [u8]> {
        if lo > hi {
            return None;
        }
        let start = self.offset_of(lo)?;
        let end = self.offset_of(hi)?;
        Some(&self.buf[start..end])
    }
}

/// Split `buf` into lines.
///
/// Each line ends at (and includes) a `\n`; trailing bytes without a
/// terminator form a final line. An empty buffer yields no lines.
pub fn split_lines(buf: &[u8]) -> LinesResult<LineSequence<'_>> {
    let newlines = memchr::memchr_iter(b'\n', buf).count();
    let unterminated = usize::from(buf.last().is_some_and(|&b| b != b'\n'));

    let mut lines = Vec::new();
    lines
        .try_reserve_exact(newlines + unterminated)
        .map_err(LinesError::exhausted("splitting lines"))?;

    let mut start = 0;
    for nl in memchr::memchr_iter(b'\n', buf) {
        let end = nl + 1;
        lines.push(Line {
            start,
            end,
            hash: line_hash(&buf[start..end]),
        });
        start = end;
    }
    if start < buf.len() {
        lines.push(Line {
            start,
            end: buf.len(),
            hash: line_hash(&buf[start..]),
        });
    }

    Ok(LineSequence { buf, lines })
}
