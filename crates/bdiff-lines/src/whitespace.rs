//! Whitespace normalization applied before matching.
//!
//! Normalization never adds or removes `\n`, so the normalized buffer has
//! exactly as many lines as the original and line indices carry over.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{LinesError, LinesResult};

/// How whitespace differences are treated when comparing lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceMode {
    /// Lines must match byte for byte.
    #[default]
    Exact,
    /// Runs of blanks compare equal to a single space; trailing blanks are ignored.
    IgnoreChange,
    /// All blanks are ignored.
    IgnoreAll,
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

/// Produce the buffer that matching should see under `mode`.
///
/// `Exact` borrows the input unchanged.
pub fn normalize_whitespace(buf: &[u8], mode: WhitespaceMode) -> LinesResult<Cow<'_, [u8]>> {
    if mode == WhitespaceMode::Exact {
        return Ok(Cow::Borrowed(buf));
    }

    let mut out = Vec::new();
    out.try_reserve_exact(buf.len())
        .map_err(LinesError::exhausted("normalizing whitespace"))?;

    for &b in buf {
        if is_blank(b) {
            if mode == WhitespaceMode::IgnoreChange && out.last() != Some(&b' ') {
                out.push(b' ');
            }
        } else if b == b'\n' && out.last() == Some(&b' ') {
            // Only reachable in IgnoreChange: a collapsed trailing blank.
            if let Some(last) = out.last_mut() {
                *last = b'\n';
            }
        } else {
            out.push(b);
        }
    }

    Ok(Cow::Owned(out))
}
