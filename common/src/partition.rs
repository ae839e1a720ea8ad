use std::{fmt, num::NonZeroUsize};

use crate::{Error, Result};

pub const DEFAULT_WORKERS: usize = 4;

/// A validated number of workers, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    pub fn new(n: i64) -> Result<Self> {
        usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!("worker count must be at least 1, got {n}"))
            })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_WORKERS).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        NonZeroUsize::new(n).map(Self).ok_or_else(|| {
            Error::InvalidConfiguration("worker count must be at least 1, got 0".to_string())
        })
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Splits `lines` into exactly `workers` contiguous slices.
///
/// Every slice gets `len / workers` lines and the remainder goes to the last
/// one, so the slices always cover all of `lines`. With fewer lines than
/// workers the leading slices are empty.
pub fn partition<T>(lines: &[T], workers: WorkerCount) -> Vec<&[T]> {
    let n = workers.get();
    let size = lines.len() / n;
    (0..n)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == n { lines.len() } else { start + size };
            &lines[start..end]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(n: usize) -> WorkerCount {
        WorkerCount::try_from(n).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_counts() {
        for n in [0, -1, -42] {
            assert!(matches!(
                WorkerCount::new(n),
                Err(Error::InvalidConfiguration(_))
            ));
        }
        assert!(WorkerCount::try_from(0usize).is_err());
        assert_eq!(WorkerCount::new(3).unwrap().get(), 3);
        assert_eq!(WorkerCount::default().get(), DEFAULT_WORKERS);
    }

    #[test]
    fn test_partitions_cover_all_lines_in_order() {
        let lines: Vec<String> = (0..23).map(|i| format!("line {i}")).collect();
        for n in [1, 2, 3, 4, 10, 23, 30] {
            let parts = partition(&lines, workers(n));
            assert_eq!(parts.len(), n);
            assert_eq!(parts.concat(), lines, "workers = {n}");
        }
    }

    #[test]
    fn test_remainder_goes_to_last_partition() {
        let lines: Vec<u32> = (0..10).collect();
        let sizes: Vec<usize> = partition(&lines, workers(4)).iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 4]);
    }

    #[test]
    fn test_more_workers_than_lines() {
        let lines = ["a b", "c"];
        let parts = partition(&lines, workers(5));
        assert_eq!(parts.len(), 5);
        assert!(parts[..4].iter().all(|p| p.is_empty()));
        assert_eq!(parts[4], &lines[..]);
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<String> = Vec::new();
        let parts = partition(&lines, workers(3));
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.is_empty()));
    }
}
