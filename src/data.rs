//! Data structures for representing scanned entries and long-path violations.
//!
//! This module defines the core data structures used throughout `longpaths`:
//! entries produced during traversal, the violations derived from them, and
//! the result of a complete scan.

use crate::metrics::PhaseResult;

/// A file system entry discovered during traversal.
///
/// # Fields
/// * `path` - The fully-qualified path as a string
/// * `kind` - File or folder, when the enumerator knows it
/// * `size` - Size in bytes (files only, and only when sizes are collected)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub kind: Option<EntryKind>,
    pub size: Option<u64>,
}

impl Entry {
    /// Creates an untyped entry carrying only a path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: None,
            size: None,
        }
    }
}

/// Represents the type of file system entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    /// Returns a string representation of the entry kind.
    ///
    /// # Returns
    /// * `"File"` for `EntryKind::File`
    /// * `"Folder"` for `EntryKind::Folder`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Folder => "Folder",
        }
    }
}

/// An entry whose path is longer than the configured maximum.
///
/// `name` and `parent` are derived when the violation is built so that
/// renderers and exporters never have to compute anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: Option<EntryKind>,
    pub path: String,
    pub length: u32,
    pub excess: u32,
    pub name: String,
    pub parent: String,
    pub size: Option<u64>,
}

/// Summary statistics computed over a scan's violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of violations found
    pub count: usize,
    /// Longest violating path, `None` when nothing was flagged
    pub max_length: Option<u32>,
    pub files: usize,
    pub folders: usize,
    /// Entries produced by the enumerator
    pub entries_scanned: usize,
    /// Batches handed to the worker pool (0 for sequential scans)
    pub batches: usize,
    pub failed_batches: usize,
    /// Diagnostic events recorded during the scan
    pub diagnostics: usize,
}

/// The outcome of a completed scan.
///
/// Violations carry no ordering guarantee; sort them before presenting.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub violations: Vec<Violation>,
    pub summary: ScanSummary,
    pub phases: Vec<PhaseResult>,
}
