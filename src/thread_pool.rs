//! Worker pool for filtering batches in parallel.
//!
//! This module provides:
//! - [`ThreadPoolStrategy`]: how the throttle limit is chosen when the user
//!   does not give one explicitly
//! - [`WorkerPool`]: a dedicated `rayon` pool of exactly `throttle_limit`
//!   threads that runs one unit of work per batch
//!
//! # Strategies
//! - `Default`: one worker per available CPU
//! - `Fixed`: exactly the number of workers requested
//! - `NumCpusMinus1`: leaves one CPU free
//! - `IOHeavy`: twice the CPU count

use crate::data::Violation;
use crate::diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink};
use crate::error::{Result, ScanError};
use crate::partition::Batch;
use clap::ValueEnum;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

/// Thread pool sizing strategies.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum ThreadPoolStrategy {
    /// One worker per available CPU
    #[default]
    Default,
    /// Use a fixed number of workers
    Fixed,
    /// Use number of CPUs minus 1 (leaves one CPU free)
    NumCpusMinus1,
    /// Oversubscribe for slow storage (2x CPU count)
    IOHeavy,
}

impl ThreadPoolStrategy {
    /// Returns a string representation of the strategy for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadPoolStrategy::Default => "Default",
            ThreadPoolStrategy::Fixed => "Fixed",
            ThreadPoolStrategy::NumCpusMinus1 => "NumCpusMinus1",
            ThreadPoolStrategy::IOHeavy => "IOHeavy",
        }
    }

    /// Resolves the throttle limit for this strategy.
    ///
    /// # Arguments
    /// * `requested` - Explicit worker count; always wins when given, and is
    ///   mandatory for `Fixed`
    ///
    /// # Examples
    /// ```rust
    /// use longpaths::thread_pool::ThreadPoolStrategy;
    ///
    /// assert_eq!(ThreadPoolStrategy::Default.throttle_limit(Some(3)).unwrap(), 3);
    /// assert!(ThreadPoolStrategy::Fixed.throttle_limit(None).is_err());
    /// ```
    pub fn throttle_limit(&self, requested: Option<usize>) -> Result<usize> {
        if let Some(n) = requested {
            if n == 0 {
                return Err(ScanError::InvalidThrottleLimit);
            }
            return Ok(n);
        }

        let cpus = num_cpus::get();
        match self {
            ThreadPoolStrategy::Default => Ok(cpus),
            ThreadPoolStrategy::Fixed => Err(ScanError::InvalidThrottleLimit),
            ThreadPoolStrategy::NumCpusMinus1 => Ok(std::cmp::max(1, cpus.saturating_sub(1))),
            ThreadPoolStrategy::IOHeavy => Ok(cpus * 2),
        }
    }
}

/// What one batch produced.
#[derive(Debug)]
pub enum BatchOutcome {
    Completed {
        index: usize,
        violations: Vec<Violation>,
    },
    /// The unit of work panicked; the batch contributes nothing
    Failed { index: usize, message: String },
}

impl BatchOutcome {
    pub fn index(&self) -> usize {
        match self {
            BatchOutcome::Completed { index, .. } | BatchOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }
}

/// A bounded pool of worker threads.
///
/// The underlying `rayon` pool is created in [`WorkerPool::new`] and shut down
/// when the `WorkerPool` is dropped, whichever way the scan exits.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    throttle_limit: usize,
    sink: Arc<dyn DiagnosticSink>,
}

impl WorkerPool {
    /// Starts a pool with `throttle_limit` workers.
    pub fn new(throttle_limit: usize, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        if throttle_limit == 0 {
            return Err(ScanError::InvalidThrottleLimit);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(throttle_limit)
            .thread_name(|i| format!("longpaths-worker-{}", i))
            .build()?;
        debug!(workers = throttle_limit, "Worker pool started");
        Ok(Self {
            pool,
            throttle_limit,
            sink,
        })
    }

    pub fn throttle_limit(&self) -> usize {
        self.throttle_limit
    }

    /// Runs `work` once per batch and waits for every batch to finish.
    ///
    /// At most `throttle_limit` batches run at the same time; the rest wait
    /// for a free worker. Each batch fills its own result vector. A batch
    /// whose `work` panics is reported to the diagnostic sink and returned as
    /// [`BatchOutcome::Failed`]. Outcomes come back in batch order.
    ///
    /// `progress`, when given, is advanced as each batch completes.
    pub fn dispatch<T, F>(
        &self,
        batches: Vec<Batch<'_, T>>,
        work: F,
        progress: Option<&ProgressBar>,
    ) -> Vec<BatchOutcome>
    where
        T: Sync,
        F: Fn(&[T]) -> Vec<Violation> + Sync,
    {
        debug!(
            batches = batches.len(),
            workers = self.throttle_limit,
            "Dispatching batches"
        );

        self.pool.install(|| {
            batches
                .into_par_iter()
                .map(|batch| {
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(batch.items)))
                    {
                        Ok(violations) => BatchOutcome::Completed {
                            index: batch.index,
                            violations,
                        },
                        Err(payload) => {
                            let message = format!(
                                "Batch {} ({} entries from offset {}) failed: {}",
                                batch.index,
                                batch.len(),
                                batch.start,
                                panic_message(payload.as_ref())
                            );
                            self.sink.record(DiagnosticEvent::new(
                                None,
                                DiagnosticKind::BatchFailed,
                                message.clone(),
                            ));
                            BatchOutcome::Failed {
                                index: batch.index,
                                message,
                            }
                        }
                    };
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    outcome
                })
                .collect()
        })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        debug!(workers = self.throttle_limit, "Worker pool released");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
