//! Structured diagnostics for recoverable scan problems.
//!
//! Unreadable directories and failed batches do not stop a scan. Each one is
//! turned into a [`DiagnosticEvent`] and handed to a [`DiagnosticSink`], which
//! decides what to do with it. The CLI uses [`TracingSink`]; tests use
//! [`MemorySink`] to inspect what happened.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Listing a directory was refused by the OS
    AccessDenied,
    /// Any other I/O failure while listing a directory
    Io,
    /// A worker panicked while filtering a batch
    BatchFailed,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::AccessDenied => "access-denied",
            DiagnosticKind::Io => "io",
            DiagnosticKind::BatchFailed => "batch-failed",
        }
    }

    /// Classifies an I/O error raised while listing a directory.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => DiagnosticKind::AccessDenied,
            _ => DiagnosticKind::Io,
        }
    }
}

/// A single recoverable problem observed during a scan.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// Subtree that was skipped, if the problem is tied to a path
    pub path: Option<PathBuf>,
    pub kind: DiagnosticKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn new(path: Option<PathBuf>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Builds an event for a directory whose listing failed.
    pub fn for_listing(path: PathBuf, err: &io::Error) -> Self {
        Self::new(Some(path), DiagnosticKind::from_io(err), err.to_string())
    }
}

/// Receives diagnostic events. Called from worker threads, so it must be
/// thread-safe.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);

    /// Number of events recorded so far.
    fn count(&self) -> usize;
}

/// Forwards events to `tracing`. Skipped subtrees are logged at debug level,
/// failed batches at warn.
#[derive(Debug, Default)]
pub struct TracingSink {
    recorded: AtomicUsize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        self.recorded.fetch_add(1, Ordering::Relaxed);
        let path = event
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match event.kind {
            DiagnosticKind::BatchFailed => warn!(
                kind = event.kind.as_str(),
                at = %event.timestamp.to_rfc3339(),
                "{}",
                event.message
            ),
            _ => debug!(
                kind = event.kind.as_str(),
                path = %path,
                at = %event.timestamp.to_rfc3339(),
                "Skipping subtree: {}",
                event.message
            ),
        }
    }

    fn count(&self) -> usize {
        self.recorded.load(Ordering::Relaxed)
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        self.events.lock().push(event);
    }

    fn count(&self) -> usize {
        self.events.lock().len()
    }
}
