//! Main entry point for the `longpaths` CLI application.
//!
//! `longpaths` walks a directory tree and reports every entry whose full path
//! is longer than a maximum number of characters, which is useful before
//! copying a tree onto a filesystem or tool with a path length limit.
//!
//! # Responsibilities
//! - Parses CLI arguments via [`clap`] using the [`Args`] struct
//! - Sets up `tracing` output
//! - Delegates traversal and filtering to [`Scanner`]
//! - Sorts the report and renders it to the terminal or a CSV file
//!
//! # Flags of Interest
//! - `--max-length N`: Report paths longer than N characters
//! - `--parallel`: Filter on a worker pool (`--throttle-limit`, `--batch-size`)
//! - `--exclude PATTERN`: Skip matching paths
//! - `--output FILE`: Export to CSV

use anyhow::{Context, Result};
use clap::Parser;
use longpaths::metrics::{ProfileData, print_profile_summary, rss_after_phase, save_stats_json};
use longpaths::output::{render_csv, render_terminal};
use longpaths::utils::sort_violations;
use longpaths::{Args, ScanResult, Scanner};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "longpaths=debug,warn"
    } else {
        "longpaths=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Writes the report to CSV when requested, falling back to the terminal if
/// the export fails.
fn output_results(result: &ScanResult, args: &Args) {
    if args.output.is_some() {
        match render_csv(&result.violations, args) {
            Ok(()) => return,
            Err(err) => warn!("CSV export failed, printing to terminal instead: {:#}", err),
        }
    }
    if let Err(err) = render_terminal(&result.violations, &result.summary, args) {
        warn!("Failed to print results: {:#}", err);
    }
}

fn report_profile(result: &ScanResult, args: &Args, workers: usize, enumerator: &str) {
    let mut profile = ProfileData::new();
    for phase in &result.phases {
        profile.add_phase(phase.clone());
    }
    profile.record_memory(rss_after_phase());
    profile.add_metadata("enumerator", enumerator);
    profile.add_metadata("entries", result.summary.entries_scanned);
    profile.add_metadata("violations", result.summary.count);
    profile.add_metadata("diagnostics", result.summary.diagnostics);
    if args.parallel {
        profile.add_metadata("workers", workers);
        profile.add_metadata("batches", result.summary.batches);
        profile.add_metadata("failed_batches", result.summary.failed_batches);
    }

    print_profile_summary(&profile);

    if let Some(csv_path) = &args.output {
        match save_stats_json(Path::new(csv_path), &profile) {
            Ok(path) => println!("Performance stats saved to: {}", path.display()),
            Err(err) => warn!("Failed to save stats: {:#}", err),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = args.to_config().context("Invalid arguments")?;
    let workers = config.throttle_limit;
    if args.parallel {
        println!(
            "🔧 Scanning {} with {} worker(s), batches of {}",
            args.path.display(),
            workers,
            args.batch_size
        );
    } else {
        println!("🔧 Scanning {}", args.path.display());
    }

    let scanner = Scanner::new(config).context("Scan setup failed")?;
    let enumerator = scanner.enumerator_name();
    let mut result = scanner.run().context("Scan failed")?;

    sort_violations(&mut result.violations, args.sort);
    output_results(&result, &args);

    if args.profile {
        report_profile(&result, &args, workers, enumerator);
    }

    Ok(())
}
