//! Path length filter.
//!
//! Length is the number of `char`s in the path string. Both enumerators hand
//! over lossily-converted UTF-8 strings, so every path in a run is counted in
//! the same unit.

use crate::data::{Entry, Violation};

/// Returns the length of `path` in characters, saturating at `u32::MAX`.
pub fn path_length(path: &str) -> u32 {
    u32::try_from(path.chars().count()).unwrap_or(u32::MAX)
}

/// Checks a single entry against `max_length`.
///
/// Returns a fully populated [`Violation`] when the entry's path is strictly
/// longer than `max_length`, otherwise `None`.
pub fn check(entry: &Entry, max_length: u32) -> Option<Violation> {
    let length = path_length(&entry.path);
    if length <= max_length {
        return None;
    }

    let (parent, name) = split_path(&entry.path);
    Some(Violation {
        kind: entry.kind,
        path: entry.path.clone(),
        length,
        excess: length - max_length,
        name: name.to_string(),
        parent: parent.to_string(),
        size: entry.size,
    })
}

/// Filters a slice of entries, preserving their order.
pub fn filter_entries(entries: &[Entry], max_length: u32) -> Vec<Violation> {
    entries
        .iter()
        .filter_map(|entry| check(entry, max_length))
        .collect()
}

/// Splits a path string into (parent, name) on the last separator.
///
/// Works on the string form so that Windows-style paths are split the same
/// way on every host.
fn split_path(path: &str) -> (&str, &str) {
    let is_sep = |c: char| c == '/' || c == '\\';
    let trimmed = path.trim_end_matches(is_sep);
    match trimmed.rfind(is_sep) {
        Some(0) => (&trimmed[..1], &trimmed[1..]),
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    }
}
