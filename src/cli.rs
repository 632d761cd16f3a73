//! CLI interface definitions for the `longpaths` application.
//!
//! This module defines command-line arguments using [`clap`] and exposes:
//!
//! - [`Args`]: the main struct parsed from CLI inputs
//! - [`SortKey`]: an enum for ordering the report by `length` or `path`
//!
//! # Example
//!
//! ```bash
//! longpaths /srv/share --max-length 240 --parallel --exclude .git --output long.csv
//! ```

use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_LENGTH, ScanConfig};
use crate::error::Result;
use crate::thread_pool::ThreadPoolStrategy;
use crate::walk::WalkStrategy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the `longpaths` scanner.
#[derive(Parser, Debug, Clone)]
#[command(name = "longpaths", version, about)]
pub struct Args {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Report paths longer than this many characters
    #[arg(short = 'm', long, value_name = "CHARS", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: u32,

    /// Filter entries on a pool of worker threads
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Maximum number of concurrent workers (default: available CPUs)
    #[arg(long, value_name = "N")]
    pub throttle_limit: Option<usize>,

    /// How the worker count is chosen when --throttle-limit is not given (hidden experimental flag)
    #[arg(long = "threads-strategy", value_enum, default_value_t = ThreadPoolStrategy::Default, hide = true)]
    pub threads_strategy: ThreadPoolStrategy,

    /// Entries per batch handed to a worker
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Directory enumeration strategy
    #[arg(long, value_enum, default_value_t = WalkStrategy::Auto)]
    pub strategy: WalkStrategy,

    /// Skip entries with matching names or globs (e.g., '.git', 'node_modules')
    #[arg(long, value_name = "PATTERN", num_args = 1.., action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Include type, name, parent and file size in the report
    #[arg(long, default_value_t = false)]
    pub detailed: bool,

    /// Sort output by length or path
    #[arg(long, value_enum, default_value_t = SortKey::Length)]
    pub sort: SortKey,

    /// Only print the first N violations to the terminal
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Write violations to a CSV file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Hide progress indicators
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Enable performance profiling and show timing summary
    #[arg(long, default_value_t = false)]
    pub profile: bool,

    /// Log skipped directories and scan phases
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Builds the scan configuration described by these arguments.
    ///
    /// Only the worker count is checked here; everything else is validated
    /// when the scanner is built.
    pub fn to_config(&self) -> Result<ScanConfig> {
        let throttle_limit = self.threads_strategy.throttle_limit(self.throttle_limit)?;
        Ok(ScanConfig {
            root: self.path.clone(),
            max_length: self.max_length,
            use_parallel: self.parallel,
            throttle_limit,
            batch_size: self.batch_size,
            strategy: self.strategy,
            excludes: self.exclude.clone(),
            collect_sizes: self.detailed,
            show_progress: !self.no_progress,
        })
    }
}

/// Enum for specifying how to sort the report.
///
/// # Variants
/// * `Length` - Longest path first
/// * `Path` - Alphabetical by path
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum SortKey {
    Length,
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["longpaths"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.max_length, 260);
        assert!(!args.parallel);
        assert_eq!(args.batch_size, 1000);
        assert_eq!(args.strategy, WalkStrategy::Auto);
        assert_eq!(args.sort, SortKey::Length);
    }

    #[test]
    fn test_parallel_flags_reach_config() {
        let args = Args::parse_from([
            "longpaths",
            "/data",
            "-m",
            "120",
            "--parallel",
            "--throttle-limit",
            "3",
            "--batch-size",
            "50",
            "--strategy",
            "stack",
            "--exclude",
            ".git",
            "target",
            "--detailed",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.max_length, 120);
        assert!(config.use_parallel);
        assert_eq!(config.throttle_limit, 3);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.strategy, WalkStrategy::Stack);
        assert_eq!(config.excludes, vec![".git".to_string(), "target".to_string()]);
        assert!(config.collect_sizes);
    }

    #[test]
    fn test_zero_max_length_parses_but_fails_validation() {
        let args = Args::parse_from(["longpaths", ".", "--max-length", "0"]);
        let config = args.to_config().unwrap();
        assert!(matches!(config.validate(), Err(ScanError::InvalidMaxLength)));
    }

    #[test]
    fn test_zero_throttle_limit_rejected() {
        let args = Args::parse_from(["longpaths", "--throttle-limit", "0"]);
        assert!(matches!(args.to_config(), Err(ScanError::InvalidThrottleLimit)));
    }
}
