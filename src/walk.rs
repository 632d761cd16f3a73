//! Directory enumeration.
//!
//! Two interchangeable enumerators produce the same set of entries for a
//! tree:
//! - [`NativeEnumerator`] hands the whole walk to `walkdir`
//! - [`StackEnumerator`] keeps its own LIFO stack of directories and lists
//!   them one at a time with `std::fs::read_dir`
//!
//! Neither yields the root itself, neither follows symlinks, and both apply
//! the same [`ExcludeSet`]. A directory that cannot be listed is reported to
//! the configured [`DiagnosticSink`] and its subtree is skipped; the walk
//! carries on with everything else.

use crate::data::{Entry, EntryKind};
use crate::diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink};
use crate::utils::{ExcludeSet, path_to_string};
use clap::ValueEnum;
use std::fs::{self, FileType, ReadDir};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Which enumerator to use.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum WalkStrategy {
    /// Pick the best enumerator the host supports
    #[default]
    Auto,
    /// Single-pass recursive walk via `walkdir`
    Native,
    /// Explicit stack of directories listed with `read_dir`
    Stack,
}

impl WalkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkStrategy::Auto => "auto",
            WalkStrategy::Native => "native",
            WalkStrategy::Stack => "stack",
        }
    }
}

/// Settings shared by both enumerators.
#[derive(Clone)]
pub struct WalkOptions {
    pub excludes: ExcludeSet,
    /// Read file sizes while walking (costs a `stat` per file)
    pub collect_sizes: bool,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl WalkOptions {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            excludes: ExcludeSet::empty(),
            collect_sizes: false,
            sink,
        }
    }

    fn make_entry(
        &self,
        path: &Path,
        file_type: FileType,
        size: impl FnOnce() -> Option<u64>,
    ) -> Entry {
        let kind = if file_type.is_dir() {
            EntryKind::Folder
        } else {
            EntryKind::File
        };
        let size = if self.collect_sizes && kind == EntryKind::File {
            size()
        } else {
            None
        };
        Entry {
            path: path_to_string(path),
            kind: Some(kind),
            size,
        }
    }
}

/// A source of entries beneath a root directory.
///
/// The returned iterator is lazy and can only be consumed once.
pub trait Enumerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn entries<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Entry> + 'a>;
}

/// Builds the enumerator for `strategy`.
///
/// `walkdir` works on every platform this crate targets, so `Auto` resolves
/// to the native walk whenever it is supported.
pub fn select(strategy: WalkStrategy, options: WalkOptions) -> Box<dyn Enumerator> {
    let resolved = match strategy {
        WalkStrategy::Auto if NativeEnumerator::is_supported() => WalkStrategy::Native,
        WalkStrategy::Auto => WalkStrategy::Stack,
        other => other,
    };
    debug!(
        requested = strategy.as_str(),
        resolved = resolved.as_str(),
        "Selected enumerator"
    );

    match resolved {
        WalkStrategy::Stack => Box::new(StackEnumerator::new(options)),
        _ => Box::new(NativeEnumerator::new(options)),
    }
}

/// Recursive enumeration backed by `walkdir`.
pub struct NativeEnumerator {
    options: WalkOptions,
}

impl NativeEnumerator {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    pub fn is_supported() -> bool {
        cfg!(any(unix, windows))
    }

    fn report(&self, err: walkdir::Error) {
        let kind = err
            .io_error()
            .map(DiagnosticKind::from_io)
            .unwrap_or(DiagnosticKind::Io);
        let path = err.path().map(Path::to_path_buf);
        self.options
            .sink
            .record(DiagnosticEvent::new(path, kind, err.to_string()));
    }
}

impl Enumerator for NativeEnumerator {
    fn name(&self) -> &'static str {
        "native"
    }

    fn entries<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Entry> + 'a> {
        let excludes = &self.options.excludes;
        let root_path = root.to_path_buf();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |e| !excludes.is_excluded(&root_path, e.path()));

        Box::new(walker.filter_map(move |res| match res {
            Ok(dent) => Some(self.options.make_entry(dent.path(), dent.file_type(), || {
                dent.metadata().ok().map(|m| m.len())
            })),
            Err(err) => {
                self.report(err);
                None
            }
        }))
    }
}

/// Manual depth-first enumeration with an explicit directory stack.
pub struct StackEnumerator {
    options: WalkOptions,
}

impl StackEnumerator {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }
}

impl Enumerator for StackEnumerator {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn entries<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = Entry> + 'a> {
        Box::new(StackWalk {
            options: &self.options,
            root: root.to_path_buf(),
            stack: vec![root.to_path_buf()],
            current: None,
        })
    }
}

/// Iterator state for [`StackEnumerator`].
struct StackWalk<'a> {
    options: &'a WalkOptions,
    root: PathBuf,
    stack: Vec<PathBuf>,
    /// Directory being listed and its open handle
    current: Option<(PathBuf, ReadDir)>,
}

impl StackWalk<'_> {
    fn report(&self, path: PathBuf, err: &std::io::Error) {
        self.options
            .sink
            .record(DiagnosticEvent::for_listing(path, err));
    }
}

impl Iterator for StackWalk<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            let Some((dir, listing)) = self.current.as_mut() else {
                // LIFO: the most recently discovered directory is expanded next
                let dir = self.stack.pop()?;
                match fs::read_dir(&dir) {
                    Ok(listing) => self.current = Some((dir, listing)),
                    Err(err) => self.report(dir, &err),
                }
                continue;
            };

            match listing.next() {
                Some(Ok(child)) => {
                    let path = child.path();
                    if self.options.excludes.is_excluded(&self.root, &path) {
                        continue;
                    }
                    let file_type = match child.file_type() {
                        Ok(ft) => ft,
                        Err(err) => {
                            self.report(path, &err);
                            continue;
                        }
                    };
                    if file_type.is_dir() {
                        self.stack.push(path.clone());
                    }
                    return Some(self.options.make_entry(&path, file_type, || {
                        child.metadata().ok().map(|m| m.len())
                    }));
                }
                Some(Err(err)) => {
                    let dir = dir.clone();
                    self.report(dir, &err);
                }
                None => self.current = None,
            }
        }
    }
}
