//! Error types for `longpaths`.
//!
//! Only setup problems are errors. Anything that goes wrong once traversal has
//! started (an unreadable directory, a batch that panics) is recorded as a
//! [`DiagnosticEvent`](crate::diagnostics::DiagnosticEvent) and the scan keeps
//! going with whatever it could collect.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the scanning library.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Fatal errors raised before any traversal begins.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root does not exist
    #[error("Root path '{0}' does not exist")]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory
    #[error("Root path '{0}' is not a directory")]
    RootNotDirectory(PathBuf),

    /// The scan root could not be made absolute
    #[error("Failed to resolve root path '{path}': {source}")]
    RootUnresolved {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Maximum path length must be greater than 0")]
    InvalidMaxLength,

    #[error("Throttle limit must be at least 1")]
    InvalidThrottleLimit,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    /// An exclude pattern failed to compile
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The worker pool could not be started
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}
