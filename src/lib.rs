//! Library crate for longpaths
//!
//! Finds every entry beneath a directory whose full path is longer than a
//! configured number of characters.
//!
//! # Features
//!
//! - **Two enumerators**: a `walkdir`-backed walk and a manual stack walk that
//!   yield the same entries and skip unreadable subtrees
//! - **Parallel filtering**: entries are split into batches and filtered on a
//!   bounded worker pool
//! - **Structured diagnostics**: skipped subtrees and failed batches are
//!   reported to a pluggable sink
//! - **Output**: terminal table and CSV export
//!
//! # Modules
//!
//! - [`walk`]: directory enumeration
//! - [`filter`]: path length check
//! - [`partition`]: batch partitioning
//! - [`thread_pool`]: worker pool and batch dispatch
//! - [`aggregate`]: merging and summary statistics
//! - [`scan`]: scan orchestration
//! - [`output`]: terminal and CSV formatters
//!
//! # Example
//!
//! ```no_run
//! use longpaths::{ScanConfig, scan};
//!
//! let config = ScanConfig::new("/srv/share", 240).parallel(8, 1000);
//! let result = scan(config).unwrap();
//! for v in &result.violations {
//!     println!("{} ({} over)", v.path, v.excess);
//! }
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod output;
pub mod partition;
pub mod scan;
pub mod thread_pool;
pub mod utils;
pub mod walk;

pub use cli::Args;
pub use config::ScanConfig;
pub use data::{Entry, EntryKind, ScanResult, ScanSummary, Violation};
pub use error::ScanError;
pub use scan::{Scanner, scan};
