//! Scan configuration.

use crate::error::{Result, ScanError};
use crate::walk::WalkStrategy;
use std::path::PathBuf;

/// Maximum path length used when none is given (the classic Windows `MAX_PATH`).
pub const DEFAULT_MAX_LENGTH: u32 = 260;

/// Entries per batch handed to a worker.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Immutable input to a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Paths strictly longer than this are reported
    pub max_length: u32,
    pub use_parallel: bool,
    /// Upper bound on concurrently running workers
    pub throttle_limit: usize,
    pub batch_size: usize,
    pub strategy: WalkStrategy,
    /// Exclude patterns, compiled when the scanner is built
    pub excludes: Vec<String>,
    /// Record file sizes for the detailed report
    pub collect_sizes: bool,
    pub show_progress: bool,
}

impl ScanConfig {
    /// Creates a sequential configuration with default settings.
    pub fn new(root: impl Into<PathBuf>, max_length: u32) -> Self {
        Self {
            root: root.into(),
            max_length,
            use_parallel: false,
            throttle_limit: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
            strategy: WalkStrategy::Auto,
            excludes: Vec::new(),
            collect_sizes: false,
            show_progress: false,
        }
    }

    /// Switches to parallel filtering with the given pool size and batch size.
    pub fn parallel(mut self, throttle_limit: usize, batch_size: usize) -> Self {
        self.use_parallel = true;
        self.throttle_limit = throttle_limit;
        self.batch_size = batch_size;
        self
    }

    pub fn with_strategy(mut self, strategy: WalkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks everything that must hold before traversal begins.
    ///
    /// # Errors
    /// Returns a setup error when the root is missing or not a directory, or
    /// when `max_length`, `throttle_limit` or `batch_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(ScanError::InvalidMaxLength);
        }
        if self.throttle_limit == 0 {
            return Err(ScanError::InvalidThrottleLimit);
        }
        if self.batch_size == 0 {
            return Err(ScanError::InvalidBatchSize);
        }
        if !self.root.exists() {
            return Err(ScanError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::RootNotDirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Makes a relative root absolute against the working directory.
    ///
    /// Symlinks are left unresolved and no verbatim prefix is added.
    pub fn resolve_root(&mut self) -> Result<()> {
        let root = std::path::absolute(&self.root).map_err(|source| ScanError::RootUnresolved {
            path: self.root.clone(),
            source,
        })?;
        self.root = root;
        Ok(())
    }
}
