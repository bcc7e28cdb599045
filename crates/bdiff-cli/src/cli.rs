use std::path::PathBuf;

use bdiff_sdk::WhitespaceMode;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bdiff",
    about = "bdiff: line-granular diffs and binary patches",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with [diff] and [output] settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show changed line ranges between two files
    Hunks(CompareArgs),
    /// Show unchanged line runs between two files
    Blocks(CompareArgs),
    /// Summarize added and removed lines
    Stat(CompareArgs),
    /// Write the binary patch turning OLD into NEW
    Diff(DiffArgs),
    /// Apply one patch, or a chain of patches, to a base file
    Apply(ApplyArgs),
    /// List the records of a patch file
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[command(flatten)]
    pub whitespace: WhitespaceArgs,
}

#[derive(Args, Default)]
pub struct WhitespaceArgs {
    /// Treat runs of blanks as one space and ignore trailing blanks
    #[arg(short = 'b', long)]
    pub ignore_space_change: bool,
    /// Ignore all blanks when comparing lines
    #[arg(short = 'w', long, conflicts_with = "ignore_space_change")]
    pub ignore_all_space: bool,
}

impl WhitespaceArgs {
    /// The mode requested on the command line, if any.
    pub fn mode(&self) -> Option<WhitespaceMode> {
        if self.ignore_all_space {
            Some(WhitespaceMode::IgnoreAll)
        } else if self.ignore_space_change {
            Some(WhitespaceMode::IgnoreChange)
        } else {
            None
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Write the patch here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub base: PathBuf,
    #[arg(required = true)]
    pub patches: Vec<PathBuf>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub patch: PathBuf,
    /// Payload bytes shown per record
    #[arg(long)]
    pub preview: Option<usize>,
}
