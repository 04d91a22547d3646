//! Per-run performance metrics for ingestion and reduction.
//!
//! The engine never prints. It fills these structs and the caller decides
//! how to report them. All durations are in microseconds.

use smallvec::SmallVec;

/// Counts and timing collected while ingesting a record stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestMetrics {
    /// Newline-delimited records read from the stream, including
    /// malformed and blank ones.
    pub lines_read: u64,
    /// Records that parsed into a valid point mass.
    pub points_loaded: u64,
    /// Records that failed to parse and were skipped.
    pub records_rejected: u64,
    /// Parse tasks handed to the worker pool (0 in sequential mode).
    pub tasks_dispatched: u64,
    /// Wall-clock time for the whole ingestion, in microseconds.
    pub elapsed_us: u64,
}

/// Collection size after each reduction round.
///
/// A `usize` input halves to one in at most 64 rounds, so the inline
/// capacity covers every collection below four billion points.
pub type RoundSizes = SmallVec<[usize; 32]>;

/// Counts and timing collected while reducing a collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReduceMetrics {
    /// Size of the input collection.
    pub input_len: usize,
    /// Rounds performed. Always `ceil(log2(input_len))` for the pairwise
    /// strategy; 1 for the linear strategy.
    pub rounds: u32,
    /// Collection size after each round; the last entry is 1.
    pub round_sizes: RoundSizes,
    /// Total pairwise combinations (or accumulations, for the linear
    /// strategy) performed.
    pub combinations: u64,
    /// Combination tasks handed to the worker pool (0 when sequential).
    pub tasks_dispatched: u64,
    /// Wall-clock time for the whole reduction, in microseconds.
    pub elapsed_us: u64,
}

pub(crate) fn elapsed_us(start: std::time::Instant) -> u64 {
    start.elapsed().as_micros().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let i = IngestMetrics::default();
        assert_eq!(i.lines_read, 0);
        assert_eq!(i.points_loaded, 0);
        assert_eq!(i.records_rejected, 0);
        assert_eq!(i.tasks_dispatched, 0);
        assert_eq!(i.elapsed_us, 0);

        let r = ReduceMetrics::default();
        assert_eq!(r.rounds, 0);
        assert!(r.round_sizes.is_empty());
        assert_eq!(r.combinations, 0);
    }

    #[test]
    fn round_sizes_stay_inline() {
        let mut sizes = RoundSizes::new();
        let mut n = usize::MAX;
        while n > 1 {
            n = n.div_ceil(2);
            sizes.push(n);
        }
        assert_eq!(sizes.len(), 64);
        assert!(sizes.spilled());

        let mut small = RoundSizes::new();
        small.extend([3, 2, 1]);
        assert!(!small.spilled());
    }
}
