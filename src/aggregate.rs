//! Merging batch results and computing summary statistics.

use crate::data::{EntryKind, ScanSummary, Violation};
use crate::thread_pool::BatchOutcome;

/// Concatenates the violations of every completed batch in batch order.
///
/// Batches are disjoint, so nothing is deduplicated. Each batch's internal
/// order is kept; failed batches contribute nothing. Returns the merged list
/// and the number of failed batches.
pub fn merge(mut outcomes: Vec<BatchOutcome>) -> (Vec<Violation>, usize) {
    outcomes.sort_by_key(BatchOutcome::index);
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    let total: usize = outcomes
        .iter()
        .map(|o| match o {
            BatchOutcome::Completed { violations, .. } => violations.len(),
            BatchOutcome::Failed { .. } => 0,
        })
        .sum();

    let mut merged = Vec::with_capacity(total);
    for outcome in outcomes {
        if let BatchOutcome::Completed { violations, .. } = outcome {
            merged.extend(violations);
        }
    }
    (merged, failed)
}

/// Computes count, longest path and per-kind counts over `violations`.
///
/// Scan-level counters (`entries_scanned`, `batches`, ...) are left at zero
/// for the caller to fill in.
pub fn summarize(violations: &[Violation]) -> ScanSummary {
    let mut summary = ScanSummary {
        count: violations.len(),
        max_length: violations.iter().map(|v| v.length).max(),
        ..ScanSummary::default()
    };
    for v in violations {
        match v.kind {
            Some(EntryKind::File) => summary.files += 1,
            Some(EntryKind::Folder) => summary.folders += 1,
            None => {}
        }
    }
    summary
}
