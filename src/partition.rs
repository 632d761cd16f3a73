//! Splits the enumerated entries into contiguous batches for the worker pool.

use crate::error::{Result, ScanError};

/// A contiguous slice of the entry snapshot assigned to one unit of work.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a, T> {
    /// Position of this batch in partition order
    pub index: usize,
    /// Offset of the first item in the full collection
    pub start: usize,
    pub items: &'a [T],
}

impl<T> Batch<'_, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Partitions `items` into batches of at most `batch_size` items.
///
/// Batches cover the collection exactly once, in index order; only the last
/// one may be short. An empty collection yields no batches.
///
/// # Errors
/// Returns [`ScanError::InvalidBatchSize`] when `batch_size` is 0.
pub fn partition<T>(items: &[T], batch_size: usize) -> Result<Vec<Batch<'_, T>>> {
    if batch_size == 0 {
        return Err(ScanError::InvalidBatchSize);
    }

    Ok(items
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            start: index * batch_size,
            items: chunk,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_reconstruct_input() {
        let items: Vec<u32> = (0..23).collect();
        let batches = partition(&items, 5).unwrap();

        assert_eq!(batches.len(), 5);
        assert!(batches[..4].iter().all(|b| b.len() == 5));
        assert_eq!(batches[4].len(), 3);

        let rebuilt: Vec<u32> = batches.iter().flat_map(|b| b.items.iter().copied()).collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_batch_offsets_and_indices() {
        let items: Vec<u32> = (0..10).collect();
        let batches = partition(&items, 4).unwrap();
        let starts: Vec<usize> = batches.iter().map(|b| b.start).collect();
        let indices: Vec<usize> = batches.iter().map(|b| b.index).collect();
        assert_eq!(starts, vec![0, 4, 8]);
        assert_eq!(indices, vec![0, 1, 2]);
        for b in &batches {
            assert_eq!(b.items[0], b.start as u32);
        }
    }

    #[test]
    fn test_batch_size_at_least_len_gives_one_batch() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(partition(&items, 7).unwrap().len(), 1);
        assert_eq!(partition(&items, 1000).unwrap().len(), 1);
    }

    #[test]
    fn test_count_matches_ceil_division() {
        for len in 0..40 {
            for size in 1..12 {
                let items: Vec<usize> = (0..len).collect();
                let batches = partition(&items, size).unwrap();
                assert_eq!(batches.len(), len.div_ceil(size));
            }
        }
    }

    #[test]
    fn test_empty_input_gives_no_batches() {
        let items: Vec<u32> = Vec::new();
        assert!(partition(&items, 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let items = [1, 2, 3];
        assert!(matches!(
            partition(&items, 0),
            Err(ScanError::InvalidBatchSize)
        ));
    }
}
