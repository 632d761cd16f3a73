//! Scan orchestration for `longpaths`.
//!
//! A [`Scanner`] is built from a validated [`ScanConfig`] and run once:
//!
//! ```text
//! Idle -> Enumerating -> Filtering                                -> Aggregated -> Done
//!                     \-> Partitioning -> Dispatching -> Collecting -/
//! ```
//!
//! Setup problems (bad config, missing root, invalid exclude pattern, worker
//! pool that cannot start) are returned from [`Scanner::new`] before any
//! traversal happens. Once running, a scan always completes; unreadable
//! subtrees and failed batches only show up as diagnostics.
//!
//! Performance notes:
//! - Entries are materialized once and shared read-only with every worker
//! - Each batch fills its own violation list; lists are merged after the join
//! - The worker pool lives exactly as long as the parallel filtering step

use crate::aggregate::{merge, summarize};
use crate::config::ScanConfig;
use crate::data::{Entry, ScanResult, Violation};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::filter::{check, filter_entries};
use crate::metrics::{PhaseResult, PhaseTimer};
use crate::partition::partition;
use crate::thread_pool::WorkerPool;
use crate::utils::ExcludeSet;
use crate::walk::{Enumerator, WalkOptions, select};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Lifecycle of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Enumerating,
    /// Sequential filtering
    Filtering,
    Partitioning,
    Dispatching,
    Collecting,
    Aggregated,
    Done,
    /// Setup failed; no traversal took place
    Failed,
}

impl ScanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Enumerating => "enumerating",
            ScanPhase::Filtering => "filtering",
            ScanPhase::Partitioning => "partitioning",
            ScanPhase::Dispatching => "dispatching",
            ScanPhase::Collecting => "collecting",
            ScanPhase::Aggregated => "aggregated",
            ScanPhase::Done => "done",
            ScanPhase::Failed => "failed",
        }
    }
}

/// A single-use scan over one directory tree.
pub struct Scanner {
    config: ScanConfig,
    enumerator: Box<dyn Enumerator>,
    /// Present only for parallel scans
    pool: Option<WorkerPool>,
    sink: Arc<dyn DiagnosticSink>,
    phase: ScanPhase,
    phases: Vec<PhaseResult>,
}

impl Scanner {
    /// Builds a scanner that logs diagnostics through `tracing`.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(TracingSink::new()))
    }

    /// Builds a scanner that reports diagnostics to `sink`.
    ///
    /// # Errors
    /// Returns a setup error if the configuration is invalid, an exclude
    /// pattern does not compile, or the worker pool cannot be started.
    pub fn with_sink(mut config: ScanConfig, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let setup = |config: &mut ScanConfig| -> Result<(Box<dyn Enumerator>, Option<WorkerPool>)> {
            config.validate()?;
            // Lengths are measured on fully-qualified paths
            config.resolve_root()?;
            let options = WalkOptions {
                excludes: ExcludeSet::new(&config.excludes)?,
                collect_sizes: config.collect_sizes,
                sink: Arc::clone(&sink),
            };
            let enumerator = select(config.strategy, options);
            let pool = if config.use_parallel {
                Some(WorkerPool::new(config.throttle_limit, Arc::clone(&sink))?)
            } else {
                None
            };
            Ok((enumerator, pool))
        };

        match setup(&mut config) {
            Ok((enumerator, pool)) => Ok(Self {
                config,
                enumerator,
                pool,
                sink,
                phase: ScanPhase::Idle,
                phases: Vec::new(),
            }),
            Err(err) => {
                debug!(
                    phase = ScanPhase::Failed.as_str(),
                    root = %config.root.display(),
                    "Scan setup failed: {}",
                    err
                );
                Err(err)
            }
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Name of the enumerator this scanner resolved to.
    pub fn enumerator_name(&self) -> &'static str {
        self.enumerator.name()
    }

    /// Runs the scan to completion.
    ///
    /// Violations come back in no particular order.
    pub fn run(mut self) -> Result<ScanResult> {
        let diagnostics_before = self.sink.count();
        info!(
            root = %self.config.root.display(),
            max_length = self.config.max_length,
            parallel = self.config.use_parallel,
            enumerator = self.enumerator.name(),
            "Starting scan"
        );

        self.enter(ScanPhase::Enumerating);
        let timer = PhaseTimer::new("Enumerate");
        let entries = self.enumerate();
        self.phases.push(timer.finish());

        let (violations, batches, failed_batches) = match self.pool.take() {
            Some(pool) => self.filter_parallel(&entries, pool)?,
            None => (self.filter_sequential(&entries), 0, 0),
        };

        self.enter(ScanPhase::Aggregated);
        let timer = PhaseTimer::new("Aggregate");
        let mut summary = summarize(&violations);
        summary.entries_scanned = entries.len();
        summary.batches = batches;
        summary.failed_batches = failed_batches;
        summary.diagnostics = self.sink.count().saturating_sub(diagnostics_before);
        self.phases.push(timer.finish());

        self.enter(ScanPhase::Done);
        info!(
            entries = summary.entries_scanned,
            violations = summary.count,
            diagnostics = summary.diagnostics,
            "Scan complete"
        );

        Ok(ScanResult {
            violations,
            summary,
            phases: std::mem::take(&mut self.phases),
        })
    }

    fn enter(&mut self, next: ScanPhase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "Scan phase");
        self.phase = next;
    }

    /// Materializes every entry beneath the root.
    fn enumerate(&self) -> Vec<Entry> {
        let pb = self.progress_spinner();
        let entries: Vec<Entry> = self
            .enumerator
            .entries(&self.config.root)
            .inspect(|_| pb.inc(1))
            .collect();
        pb.finish_and_clear();
        debug!(entries = entries.len(), "Enumeration finished");
        entries
    }

    /// Filters every entry inline on the calling thread.
    fn filter_sequential(&mut self, entries: &[Entry]) -> Vec<Violation> {
        self.enter(ScanPhase::Filtering);
        let timer = PhaseTimer::new("Filter");
        let pb = self.progress_bar(entries.len() as u64, "entries");

        let mut violations = Vec::new();
        for entry in entries {
            if let Some(v) = check(entry, self.config.max_length) {
                violations.push(v);
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        self.phases.push(timer.finish());
        violations
    }

    /// Partitions the entries, runs every batch on `pool` and merges the
    /// per-batch results. `pool` is released when this returns.
    fn filter_parallel(
        &mut self,
        entries: &[Entry],
        pool: WorkerPool,
    ) -> Result<(Vec<Violation>, usize, usize)> {
        self.enter(ScanPhase::Partitioning);
        let batches = partition(entries, self.config.batch_size)?;
        let batch_count = batches.len();
        debug!(
            batches = batch_count,
            batch_size = self.config.batch_size,
            workers = pool.throttle_limit(),
            "Partitioned entries"
        );

        self.enter(ScanPhase::Dispatching);
        let timer = PhaseTimer::new("Dispatch");
        let pb = self.progress_bar(batch_count as u64, "batches");
        let max_length = self.config.max_length;
        let outcomes = pool.dispatch(batches, |chunk| filter_entries(chunk, max_length), Some(&pb));
        pb.finish_and_clear();
        self.phases.push(timer.finish());

        self.enter(ScanPhase::Collecting);
        let (violations, failed) = merge(outcomes);
        drop(pool);

        Ok((violations, batch_count, failed))
    }

    fn progress_spinner(&self) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
                .template("{spinner} Scanning... {pos} entries [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn progress_bar(&self, len: u64, unit: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "Filtering [{{bar:40}}] {{pos}}/{{len}} {} [{{elapsed}}]",
                    unit
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    }
}

/// Validates `config` and runs a scan with `tracing` diagnostics.
pub fn scan(config: ScanConfig) -> Result<ScanResult> {
    Scanner::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::error::ScanError;
    use crate::walk::WalkStrategy;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn build_tree(root: &std::path::Path) {
        let deep = root
            .join("a_rather_long_directory_name")
            .join("another_long_directory_name");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir(root.join("s")).unwrap();
        for i in 0..40 {
            fs::write(deep.join(format!("file_{:02}.txt", i)), "x").unwrap();
            fs::write(root.join("s").join(format!("{}", i)), "y").unwrap();
        }
    }

    fn paths(result: &ScanResult) -> BTreeSet<String> {
        result.violations.iter().map(|v| v.path.clone()).collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        build_tree(temp_dir.path());
        let threshold = temp_dir.path().to_string_lossy().chars().count() as u32 + 20;

        let sequential = scan(ScanConfig::new(temp_dir.path(), threshold)).unwrap();
        let parallel = scan(ScanConfig::new(temp_dir.path(), threshold).parallel(3, 7)).unwrap();

        assert!(sequential.summary.count > 0);
        assert_eq!(paths(&sequential), paths(&parallel));
        assert_eq!(sequential.summary.count, parallel.summary.count);
        assert_eq!(sequential.summary.max_length, parallel.summary.max_length);
        assert_eq!(sequential.summary.batches, 0);
        assert_eq!(parallel.summary.batches, 83usize.div_ceil(7));
    }

    #[test]
    fn test_every_violation_exceeds_threshold() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        build_tree(temp_dir.path());
        let threshold = temp_dir.path().to_string_lossy().chars().count() as u32 + 10;

        let result = scan(ScanConfig::new(temp_dir.path(), threshold).parallel(2, 5)).unwrap();
        assert!(!result.violations.is_empty());
        for v in &result.violations {
            assert!(v.length > threshold);
            assert_eq!(v.excess, v.length - threshold);
        }
    }

    #[test]
    fn test_large_batch_size_gives_single_batch() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        build_tree(temp_dir.path());

        let result = scan(ScanConfig::new(temp_dir.path(), 1).parallel(8, 10_000)).unwrap();
        assert_eq!(result.summary.batches, 1);
        assert_eq!(result.summary.entries_scanned, 83);
        assert_eq!(result.summary.count, 83);
    }

    #[test]
    fn test_empty_tree_gives_empty_result() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for config in [
            ScanConfig::new(temp_dir.path(), 1),
            ScanConfig::new(temp_dir.path(), 1).parallel(4, 10),
        ] {
            let result = scan(config).unwrap();
            assert!(result.violations.is_empty());
            assert_eq!(result.summary.max_length, None);
            assert_eq!(result.summary.batches, 0);
        }
    }

    #[test]
    fn test_setup_errors_stop_before_traversal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let sink = Arc::new(MemorySink::new());

        let err = Scanner::with_sink(ScanConfig::new(temp_dir.path(), 0), sink.clone())
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::InvalidMaxLength));

        let mut config = ScanConfig::new(temp_dir.path(), 10);
        config.excludes = vec!["[".to_string()];
        assert!(matches!(
            Scanner::with_sink(config, sink.clone()),
            Err(ScanError::InvalidPattern { .. })
        ));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_relative_root_reports_absolute_paths() {
        let temp_dir = tempfile::Builder::new()
            .prefix("longpaths-relative")
            .tempdir_in(".")
            .expect("Failed to create temp dir");
        assert!(temp_dir.path().is_relative());
        build_tree(temp_dir.path());
        let absolute_root = std::env::current_dir().unwrap().join(
            temp_dir.path().file_name().unwrap(),
        );

        for strategy in [WalkStrategy::Native, WalkStrategy::Stack] {
            for config in [
                ScanConfig::new(temp_dir.path(), 1).with_strategy(strategy),
                ScanConfig::new(temp_dir.path(), 1)
                    .with_strategy(strategy)
                    .parallel(2, 10),
            ] {
                let result = scan(config).unwrap();
                assert_eq!(result.summary.count, 83);
                for v in &result.violations {
                    assert!(std::path::Path::new(&v.path).starts_with(&absolute_root), "{}", v.path);
                    assert_eq!(v.length, v.path.chars().count() as u32);
                }
            }
        }
    }

    #[test]
    fn test_phases_are_recorded() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        build_tree(temp_dir.path());

        let scanner = Scanner::new(ScanConfig::new(temp_dir.path(), 10).parallel(2, 10)).unwrap();
        assert_eq!(scanner.phase(), ScanPhase::Idle);
        let result = scanner.run().unwrap();
        let names: Vec<&str> = result.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Enumerate", "Dispatch", "Aggregate"]);

        let result = scan(ScanConfig::new(temp_dir.path(), 10)).unwrap();
        let names: Vec<&str> = result.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Enumerate", "Filter", "Aggregate"]);
    }
}
