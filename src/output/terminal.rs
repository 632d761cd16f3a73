//! Terminal output for scan results.

use crate::cli::Args;
use crate::data::{ScanSummary, Violation};
use anyhow::Result;
use humansize::{DECIMAL, format_size};
use std::io::{self, Write};

/// Renders violations as an aligned table followed by a summary line.
///
/// `--top` limits the number of rows; the summary always covers everything.
pub fn render(violations: &[Violation], summary: &ScanSummary, args: &Args) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_table(&mut out, violations, summary, args)
}

/// Writes the table and summary to `out`.
pub fn write_table<W: Write>(
    out: &mut W,
    violations: &[Violation],
    summary: &ScanSummary,
    args: &Args,
) -> Result<()> {
    let shown = args.top.unwrap_or(violations.len()).min(violations.len());

    if shown > 0 {
        if args.detailed {
            writeln!(out, "{:<7} {:>7} {:>7} {:>10}  Path", "Type", "Length", "Excess", "Size")?;
        } else {
            writeln!(out, "{:>7} {:>7}  Path", "Length", "Excess")?;
        }
    }

    for v in &violations[..shown] {
        if args.detailed {
            let size = v
                .size
                .map(|s| format_size(s, DECIMAL))
                .unwrap_or_default();
            writeln!(
                out,
                "{:<7} {:>7} {:>7} {:>10}  {}",
                v.kind.map(|k| k.as_str()).unwrap_or("-"),
                v.length,
                v.excess,
                size,
                v.path
            )?;
        } else {
            writeln!(out, "{:>7} {:>7}  {}", v.length, v.excess, v.path)?;
        }
    }

    if shown < violations.len() {
        writeln!(out, "... {} more not shown", violations.len() - shown)?;
    }

    writeln!(out)?;
    match summary.max_length {
        Some(longest) => writeln!(
            out,
            "Found {} path(s) longer than {} characters ({} files, {} folders, longest {})",
            summary.count, args.max_length, summary.files, summary.folders, longest
        )?,
        None => writeln!(
            out,
            "No paths longer than {} characters",
            args.max_length
        )?,
    }
    writeln!(
        out,
        "Scanned {} entries; {} skipped subtree(s) or failed batch(es)",
        summary.entries_scanned, summary.diagnostics
    )?;
    Ok(())
}
