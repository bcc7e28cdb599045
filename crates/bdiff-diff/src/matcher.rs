//! Hash-bucketed longest-match line alignment.
//!
//! Every distinct old line gets an equivalence class. Classes are keyed by
//! the precomputed line hash *and* the bytes, so a hash collision can never
//! pair two different lines. For each class the index keeps the ascending
//! list of old positions where it occurs.
//!
//! Alignment then works on windows `[old_lo, old_hi) x [new_lo, new_hi)`.
//! The longest run of equal lines inside a window is kept as unchanged and
//! the windows before and after it are processed the same way. A window
//! without any common line becomes a single hunk. Windows live on an
//! explicit work stack, so input size never translates into call depth.
//!
//! Ties between equally long runs go to the run found first while scanning
//! the new side top to bottom, then to the lowest old position. Stored
//! patches depend on this placement, so it must stay deterministic.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use bdiff_lines::{line_hash, normalize_whitespace, LineSequence, WhitespaceMode};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::hunk::{DiffStats, Hunk, MatchingBlock};
use crate::options::DiffOptions;

/// What the matcher compares: a line's hash plus the bytes it was taken from.
#[derive(Clone, Copy, Debug)]
struct LineKey<'a> {
    hash: u64,
    bytes: &'a [u8],
}

impl PartialEq for LineKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bytes == other.bytes
    }
}

impl Eq for LineKey<'_> {}

impl Hash for LineKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// The alignment of two line sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineDiff {
    /// Replaced regions, ascending and non-overlapping.
    pub hunks: Vec<Hunk>,
    /// Unchanged runs, ascending. No sentinel.
    pub blocks: Vec<MatchingBlock>,
    /// Number of lines on the old side.
    pub old_lines: usize,
    /// Number of lines on the new side.
    pub new_lines: usize,
}

impl LineDiff {
    /// Returns `true` if both sides are line-for-line identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats::from_hunks(&self.hunks)
    }

    /// The matching blocks terminated by the `(old_lines, new_lines, 0)` sentinel.
    pub fn into_blocks_with_sentinel(self) -> DiffResult<Vec<MatchingBlock>> {
        let mut blocks = self.blocks;
        blocks
            .try_reserve_exact(1)
            .map_err(DiffError::exhausted("terminating block list"))?;
        blocks.push(MatchingBlock::sentinel(self.old_lines, self.new_lines));
        Ok(blocks)
    }
}

/// Compute the hunks that turn `old` into `new`.
pub fn diff(old: &LineSequence<'_>, new: &LineSequence<'_>) -> DiffResult<Vec<Hunk>> {
    Ok(align(old, new)?.hunks)
}

/// Align two line sequences comparing lines byte for byte.
pub fn align(old: &LineSequence<'_>, new: &LineSequence<'_>) -> DiffResult<LineDiff> {
    align_with(old, new, &DiffOptions::default())
}

/// Align two line sequences under `options`.
pub fn align_with(
    old: &LineSequence<'_>,
    new: &LineSequence<'_>,
    options: &DiffOptions,
) -> DiffResult<LineDiff> {
    match options.whitespace {
        WhitespaceMode::Exact => {
            let old_keys = exact_keys(old)?;
            let new_keys = exact_keys(new)?;
            align_keys(&old_keys, &new_keys)
        }
        mode => {
            let old_norm = normalized_lines(old, mode)?;
            let new_norm = normalized_lines(new, mode)?;
            let old_keys = hashed_keys(&old_norm)?;
            let new_keys = hashed_keys(&new_norm)?;
            align_keys(&old_keys, &new_keys)
        }
    }
}

fn alloc<T>(len: usize, context: &'static str) -> DiffResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(DiffError::exhausted(context))?;
    Ok(v)
}

fn filled<T: Clone>(len: usize, value: T, context: &'static str) -> DiffResult<Vec<T>> {
    let mut v = alloc(len, context)?;
    v.resize(len, value);
    Ok(v)
}

fn exact_keys<'a>(seq: &LineSequence<'a>) -> DiffResult<Vec<LineKey<'a>>> {
    let mut keys = alloc(seq.len(), "collecting line keys")?;
    let buf = seq.buffer();
    keys.extend(seq.lines().iter().map(|line| LineKey {
        hash: line.hash,
        bytes: &buf[line.range()],
    }));
    Ok(keys)
}

fn normalized_lines<'a>(
    seq: &LineSequence<'a>,
    mode: WhitespaceMode,
) -> DiffResult<Vec<Cow<'a, [u8]>>> {
    let mut out = alloc(seq.len(), "normalizing lines")?;
    for line in seq.iter() {
        out.push(normalize_whitespace(line, mode)?);
    }
    Ok(out)
}

fn hashed_keys<'a>(lines: &'a [Cow<'_, [u8]>]) -> DiffResult<Vec<LineKey<'a>>> {
    let mut keys = alloc(lines.len(), "collecting line keys")?;
    keys.extend(lines.iter().map(|line| LineKey {
        hash: line_hash(line),
        bytes: line,
    }));
    Ok(keys)
}

/// Old positions grouped by equivalence class, plus the class of each new line.
struct CandidateIndex {
    /// `positions[starts[c]..starts[c + 1]]` are the old lines of class `c`.
    starts: Vec<usize>,
    positions: Vec<usize>,
    /// Class of each new line; `None` when the line never occurs on the old side.
    new_classes: Vec<Option<usize>>,
}

impl CandidateIndex {
    fn build<'a>(old: &[LineKey<'a>], new: &[LineKey<'a>]) -> DiffResult<Self> {
        let mut classes: FxHashMap<LineKey<'a>, usize> = FxHashMap::default();
        classes
            .try_reserve(old.len())
            .map_err(DiffError::exhausted("indexing old lines"))?;

        let mut old_classes = alloc(old.len(), "indexing old lines")?;
        for key in old {
            let next = classes.len();
            old_classes.push(*classes.entry(*key).or_insert(next));
        }

        // Counting sort of old positions by class keeps each bucket ascending.
        let mut starts = filled(classes.len() + 1, 0usize, "bucketing old lines")?;
        for &class in &old_classes {
            starts[class + 1] += 1;
        }
        for c in 1..starts.len() {
            starts[c] += starts[c - 1];
        }
        let mut fill = alloc(starts.len(), "bucketing old lines")?;
        fill.extend_from_slice(&starts);
        let mut positions = filled(old.len(), 0usize, "bucketing old lines")?;
        for (i, &class) in old_classes.iter().enumerate() {
            positions[fill[class]] = i;
            fill[class] += 1;
        }

        let mut new_classes = alloc(new.len(), "classifying new lines")?;
        new_classes.extend(new.iter().map(|key| classes.get(key).copied()));

        Ok(Self {
            starts,
            positions,
            new_classes,
        })
    }

    /// Ascending old positions holding the same content as new line `j`.
    fn candidates(&self, j: usize) -> &[usize] {
        match self.new_classes[j] {
            Some(class) => &self.positions[self.starts[class]..self.starts[class + 1]],
            None => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct RunEnd {
    stamp: u64,
    len: usize,
}

/// Length of the equal run ending at each old line, tagged with the scan
/// row that wrote it. Only entries from the immediately preceding row are
/// ever read, so the table never needs clearing between rows or windows.
struct RunTable {
    ends: Vec<RunEnd>,
    stamp: u64,
}

impl RunTable {
    fn new(old_len: usize) -> DiffResult<Self> {
        Ok(Self {
            ends: filled(old_len, RunEnd::default(), "allocating run table")?,
            stamp: 0,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Window {
    old_lo: usize,
    old_hi: usize,
    new_lo: usize,
    new_hi: usize,
}

impl Window {
    fn as_hunk(&self) -> Hunk {
        Hunk::new(self.old_lo, self.old_hi, self.new_lo, self.new_hi)
    }

    fn contains(&self, block: &MatchingBlock) -> bool {
        block.len > 0
            && block.old_start >= self.old_lo
            && block.old_end() <= self.old_hi
            && block.new_start >= self.new_lo
            && block.new_end() <= self.new_hi
    }
}

enum Task {
    Window(Window),
    Block(MatchingBlock),
}

/// Find the longest run of equal lines inside `window`.
fn longest_match(
    index: &CandidateIndex,
    runs: &mut RunTable,
    window: &Window,
) -> Option<MatchingBlock> {
    let mut best: Option<MatchingBlock> = None;
    let mut best_row = 0;

    // Leave a gap so no run continues from the previous window's last row.
    runs.stamp += 1;

    for j in window.new_lo..window.new_hi {
        runs.stamp += 1;
        let row = runs.stamp;

        let candidates = index.candidates(j);
        let lo = candidates.partition_point(|&i| i < window.old_lo);
        let hi = candidates.partition_point(|&i| i < window.old_hi);

        // Descending, so `ends[i - 1]` still holds the previous row when read.
        for &i in candidates[lo..hi].iter().rev() {
            let len = match i.checked_sub(1) {
                Some(prev) if runs.ends[prev].stamp == row - 1 => runs.ends[prev].len + 1,
                _ => 1,
            };
            runs.ends[i] = RunEnd { stamp: row, len };

            let better = match best {
                None => true,
                Some(b) => len > b.len || (len == b.len && best_row == j),
            };
            if better {
                best = Some(MatchingBlock {
                    old_start: i + 1 - len,
                    new_start: j + 1 - len,
                    len,
                });
                best_row = j;
            }
        }
    }

    best
}

fn align_keys(old: &[LineKey<'_>], new: &[LineKey<'_>]) -> DiffResult<LineDiff> {
    let index = CandidateIndex::build(old, new)?;
    let mut runs = RunTable::new(old.len())?;

    let mut hunks: Vec<Hunk> = Vec::new();
    let mut blocks: Vec<MatchingBlock> = Vec::new();
    let mut stack = alloc(1, "allocating work stack")?;
    stack.push(Task::Window(Window {
        old_lo: 0,
        old_hi: old.len(),
        new_lo: 0,
        new_hi: new.len(),
    }));
    let mut windows = 0usize;

    while let Some(task) = stack.pop() {
        let window = match task {
            Task::Block(block) => {
                blocks
                    .try_reserve(1)
                    .map_err(DiffError::exhausted("collecting matching blocks"))?;
                blocks.push(block);
                continue;
            }
            Task::Window(window) => window,
        };
        windows += 1;

        let old_empty = window.old_lo == window.old_hi;
        let new_empty = window.new_lo == window.new_hi;
        if old_empty && new_empty {
            continue;
        }

        let found = if old_empty || new_empty {
            None
        } else {
            longest_match(&index, &mut runs, &window)
        };

        match found {
            None => {
                hunks
                    .try_reserve(1)
                    .map_err(DiffError::exhausted("collecting hunks"))?;
                hunks.push(window.as_hunk());
            }
            Some(block) => {
                if !window.contains(&block) {
                    return Err(DiffError::Internal(format!(
                        "run {block:?} escapes window {window:?}"
                    )));
                }
                stack
                    .try_reserve(3)
                    .map_err(DiffError::exhausted("growing work stack"))?;
                // Pushed in reverse: the earlier window is processed first.
                stack.push(Task::Window(Window {
                    old_lo: block.old_end(),
                    new_lo: block.new_end(),
                    ..window
                }));
                stack.push(Task::Block(block));
                stack.push(Task::Window(Window {
                    old_hi: block.old_start,
                    new_hi: block.new_start,
                    ..window
                }));
            }
        }
    }

    coalesce(&mut hunks);
    check_order(&hunks)?;

    debug!(
        old_lines = old.len(),
        new_lines = new.len(),
        windows,
        blocks = blocks.len(),
        hunks = hunks.len(),
        "aligned line sequences"
    );

    Ok(LineDiff {
        hunks,
        blocks,
        old_lines: old.len(),
        new_lines: new.len(),
    })
}

/// Merge hunks that touch with no unchanged line between them.
fn coalesce(hunks: &mut Vec<Hunk>) {
    hunks.dedup_by(|next, prev| {
        if next.old_start == prev.old_end && next.new_start == prev.new_end {
            prev.old_end = next.old_end;
            prev.new_end = next.new_end;
            true
        } else {
            false
        }
    });
}

fn check_order(hunks: &[Hunk]) -> DiffResult<()> {
    for pair in hunks.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.old_start <= prev.old_end || next.new_start <= prev.new_end {
            return Err(DiffError::Internal(format!(
                "hunks out of order: {prev:?} then {next:?}"
            )));
        }
    }
    if let Some(bad) = hunks
        .iter()
        .find(|h| h.old_start > h.old_end || h.new_start > h.new_end || h.is_noop())
    {
        return Err(DiffError::Internal(format!("malformed hunk {bad:?}")));
    }
    Ok(())
}
