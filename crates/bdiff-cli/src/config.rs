use std::path::Path;

use anyhow::Context;
use bdiff_sdk::DiffOptions;
use serde::{Deserialize, Serialize};

/// Settings read from the `--config` TOML file.
///
/// ```toml
/// [diff]
/// whitespace = "ignore-change"
///
/// [output]
/// color = false
/// preview_bytes = 32
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub diff: DiffOptions,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize text output.
    pub color: bool,
    /// Payload bytes shown per record by `inspect`.
    pub preview_bytes: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            preview_bytes: 16,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
