use bdiff_lines::WhitespaceMode;
use serde::{Deserialize, Serialize};

/// Knobs for line matching.
///
/// Options only change which lines count as equal. Hunk indices always
/// address the original buffers, and patches are always computed on
/// exact content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Whitespace handling when comparing lines.
    pub whitespace: WhitespaceMode,
}

impl DiffOptions {
    /// Byte-exact comparison (the default).
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn with_whitespace(mut self, whitespace: WhitespaceMode) -> Self {
        self.whitespace = whitespace;
        self
    }
}
