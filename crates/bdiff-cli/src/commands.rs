use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use bdiff_sdk::{Engine, Hunk, PatchReader};
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;
    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.format;
    let mut out = io::stdout().lock();
    match cli.command {
        Command::Hunks(args) => cmd_hunks(&args, &config, format, &mut out),
        Command::Blocks(args) => cmd_blocks(&args, &config, format, &mut out),
        Command::Stat(args) => cmd_stat(&args, &config, format, &mut out),
        Command::Diff(args) => cmd_diff(&args, format, &mut out),
        Command::Apply(args) => cmd_apply(&args, format, &mut out),
        Command::Inspect(args) => cmd_inspect(&args, &config, format, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "read input");
    Ok(data)
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn engine_for(args: &CompareArgs, config: &CliConfig) -> Engine {
    let mut options = config.diff.clone();
    if let Some(mode) = args.whitespace.mode() {
        options = options.with_whitespace(mode);
    }
    Engine::new(options)
}

fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn hunk_kind(hunk: &Hunk) -> colored::ColoredString {
    if hunk.is_insertion() {
        "insert".green()
    } else if hunk.is_deletion() {
        "delete".red()
    } else {
        "change".yellow()
    }
}

pub fn cmd_hunks(
    args: &CompareArgs,
    config: &CliConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let (old, new) = (read_input(&args.old)?, read_input(&args.new)?);
    let hunks = engine_for(args, config).hunks(&old, &new)?;
    match format {
        OutputFormat::Json => print_json(out, &hunks),
        OutputFormat::Text => {
            if hunks.is_empty() {
                writeln!(out, "No differences.")?;
            }
            for h in &hunks {
                writeln!(
                    out,
                    "{:<6}  old {}..{}  new {}..{}",
                    hunk_kind(h),
                    h.old_start,
                    h.old_end,
                    h.new_start,
                    h.new_end
                )?;
            }
            Ok(())
        }
    }
}

pub fn cmd_blocks(
    args: &CompareArgs,
    config: &CliConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let (old, new) = (read_input(&args.old)?, read_input(&args.new)?);
    let blocks = engine_for(args, config).blocks(&old, &new)?;
    match format {
        OutputFormat::Json => print_json(out, &blocks),
        OutputFormat::Text => {
            for b in &blocks {
                writeln!(out, "old {:>6}  new {:>6}  len {}", b.old_start, b.new_start, b.len)?;
            }
            Ok(())
        }
    }
}

pub fn cmd_stat(
    args: &CompareArgs,
    config: &CliConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let (old, new) = (read_input(&args.old)?, read_input(&args.new)?);
    let stats = engine_for(args, config).stats(&old, &new)?;
    match format {
        OutputFormat::Json => print_json(out, &stats),
        OutputFormat::Text => {
            writeln!(
                out,
                "{} hunks, {} lines added, {} lines removed",
                stats.hunks.to_string().bold(),
                format!("+{}", stats.lines_added).green(),
                format!("-{}", stats.lines_removed).red()
            )?;
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct WriteSummary<'a> {
    path: &'a Path,
    bytes: usize,
}

fn report_written(
    format: OutputFormat,
    out: &mut dyn Write,
    path: &Path,
    bytes: usize,
    what: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(out, &WriteSummary { path, bytes }),
        OutputFormat::Text => {
            writeln!(out, "{} Wrote {} ({} bytes) to {}", "✓".green().bold(), what, bytes, path.display().to_string().bold())?;
            Ok(())
        }
    }
}

pub fn cmd_diff(args: &DiffArgs, format: OutputFormat, out: &mut dyn Write) -> anyhow::Result<()> {
    let (old, new) = (read_input(&args.old)?, read_input(&args.new)?);
    let patch = Engine::default().patch(&old, &new)?;
    match &args.output {
        Some(path) => {
            write_output(path, &patch)?;
            report_written(format, out, path, patch.len(), "patch")
        }
        None => Ok(out.write_all(&patch)?),
    }
}

pub fn cmd_apply(args: &ApplyArgs, format: OutputFormat, out: &mut dyn Write) -> anyhow::Result<()> {
    let base = read_input(&args.base)?;
    let patches = args
        .patches
        .iter()
        .map(|p| read_input(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let result = Engine::default()
        .apply_chain(&base, &patches)
        .with_context(|| format!("applying patches to {}", args.base.display()))?;
    match &args.output {
        Some(path) => {
            write_output(path, &result)?;
            report_written(format, out, path, result.len(), "result")
        }
        None => Ok(out.write_all(&result)?),
    }
}

#[derive(Serialize)]
struct RecordSummary {
    offset: usize,
    start: usize,
    end: usize,
    len: usize,
    preview: String,
}

pub fn cmd_inspect(
    args: &InspectArgs,
    config: &CliConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let patch = read_input(&args.patch)?;
    let preview_len = args.preview.unwrap_or(config.output.preview_bytes);

    let mut records = Vec::new();
    for record in PatchReader::new(&patch) {
        let record = record.with_context(|| format!("decoding {}", args.patch.display()))?;
        records.push(RecordSummary {
            offset: record.offset,
            start: record.start,
            end: record.end,
            len: record.data.len(),
            preview: hex::encode(&record.data[..record.data.len().min(preview_len)]),
        });
    }

    match format {
        OutputFormat::Json => print_json(out, &records),
        OutputFormat::Text => {
            if records.is_empty() {
                writeln!(out, "Empty patch (no change).")?;
            }
            for (i, r) in records.iter().enumerate() {
                let ellipsis = if r.len > preview_len { "…" } else { "" };
                writeln!(
                    out,
                    "#{:<4} @{:<8} replace {}..{} with {} bytes  {}{}",
                    i,
                    r.offset,
                    r.start,
                    r.end,
                    r.len.to_string().bold(),
                    r.preview.dimmed(),
                    ellipsis
                )?;
            }
            Ok(())
        }
    }
}
