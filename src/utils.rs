//! Utility functions for `longpaths`.
//!
//! This module provides:
//! - Glob-based exclusion shared by both enumerators
//! - Sorting of violations for presentation
//! - Path-to-string conversion used wherever an entry is produced

use crate::cli::SortKey;
use crate::data::Violation;
use crate::error::{Result, ScanError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsString;
use std::path::Path;

/// Compiled exclusion rules.
///
/// A path is excluded when it matches one of the globs, or when any of its
/// components equals one of the bare names given on the command line.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    globs: GlobSet,
    names: Vec<OsString>,
}

impl ExcludeSet {
    /// Builds an exclusion set from user patterns.
    ///
    /// Bare names such as `node_modules` are expanded to `**/node_modules` and
    /// `**/node_modules/**`; patterns that already contain `*`, `.` or a
    /// trailing `/` are used as given.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut names = Vec::new();

        for raw in patterns {
            let pat = raw.trim();
            if pat.is_empty() {
                continue;
            }
            let globs = if pat.contains('*') || pat.ends_with('/') || pat.contains('.') {
                vec![pat.to_string()]
            } else {
                names.push(OsString::from(pat));
                vec![format!("**/{}", pat), format!("**/{}/**", pat)]
            };
            for g in globs {
                let glob = Glob::new(&g).map_err(|source| ScanError::InvalidPattern {
                    pattern: raw.clone(),
                    source,
                })?;
                builder.add(glob);
            }
        }

        let globs = builder.build().map_err(|source| ScanError::InvalidPattern {
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { globs, names })
    }

    /// An exclusion set that matches nothing.
    pub fn empty() -> Self {
        Self {
            globs: GlobSet::empty(),
            names: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    /// Returns `true` if `path` should be skipped, along with its subtree.
    ///
    /// Only the part of `path` below `root` is matched, so directories above
    /// the scan root never trigger an exclusion. The root itself is never
    /// excluded.
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if relative.as_os_str().is_empty() {
            return false;
        }
        self.globs.is_match(relative)
            || relative
                .components()
                .any(|c| self.names.iter().any(|n| c.as_os_str() == n.as_os_str()))
    }
}

/// Converts a path to the string form used for length counting.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Sorts violations based on the provided sort key.
///
/// # Behavior
/// * `SortKey::Length` - Longest path first, ties broken by path
/// * `SortKey::Path` - Alphabetical by path
pub fn sort_violations(violations: &mut [Violation], sort_key: SortKey) {
    match sort_key {
        SortKey::Length => {
            violations.sort_by(|a, b| b.length.cmp(&a.length).then_with(|| a.path.cmp(&b.path)))
        }
        SortKey::Path => violations.sort_by(|a, b| a.path.cmp(&b.path)),
    }
}
