//! Reduction engine: pairwise weighted averaging down to one point.
//!
//! Each round linearizes the current collection once and pairs
//! `(0,1), (2,3), ...`. Every pair is replaced by its
//! [`combine`](PointMass::combine) result. An odd trailing element is
//! carried into the next round unchanged, so a round maps `n` points to
//! `ceil(n/2)`. Rounds repeat until one point remains.
//!
//! Because combination is not associative in floating point, the pairing
//! schedule is part of the result. The concurrent engine runs the pairs
//! of a round on the worker pool but reassembles the results by chunk
//! index, so it is bit-identical to the sequential engine. A round starts
//! only after the previous one has been fully drained.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use bary_core::{CombineError, PointMass, WeightedSum};

use crate::config::EngineConfig;
use crate::metrics::{elapsed_us, ReduceMetrics};
use crate::pool::{self, Completed, PoolError};

// ── ReduceError ───────────────────────────────────────────────────

/// Failures of a reduction. No partial barycenter is ever returned.
#[derive(Clone, Debug, PartialEq)]
pub enum ReduceError {
    /// Fewer than two points were supplied.
    InsufficientData {
        /// Number of points supplied.
        count: usize,
    },
    /// A combination hit a non-positive mass. The reduction stopped in
    /// this round.
    DegenerateCombination {
        /// 1-based round in which the combination failed.
        round: u32,
        /// The underlying combinator error.
        source: CombineError,
    },
    /// The worker pool failed.
    Pool(PoolError),
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { count } => {
                write!(f, "insufficient data: need at least 2 points, got {count}")
            }
            Self::DegenerateCombination { round, source } => {
                write!(f, "degenerate combination in round {round}: {source}")
            }
            Self::Pool(e) => write!(f, "combine pool: {e}"),
        }
    }
}

impl Error for ReduceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DegenerateCombination { source, .. } => Some(source),
            Self::Pool(e) => Some(e),
            Self::InsufficientData { .. } => None,
        }
    }
}

impl From<PoolError> for ReduceError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

// ── Reduced ───────────────────────────────────────────────────────

/// Output of a successful reduction.
#[derive(Clone, Debug)]
pub struct Reduced {
    /// Barycenter and total mass of the input.
    pub barycenter: PointMass,
    /// Counts and timing.
    pub metrics: ReduceMetrics,
}

/// Rounds the pairwise engine needs for `n` points: `ceil(log2(n))`.
pub fn round_count(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

fn check_input(points: &[PointMass]) -> Result<(), ReduceError> {
    if points.len() < 2 {
        return Err(ReduceError::InsufficientData {
            count: points.len(),
        });
    }
    Ok(())
}

// ── Round step ────────────────────────────────────────────────────

/// Combine consecutive pairs. `points.len()` must be even.
fn combine_pairs(points: &[PointMass]) -> Result<Vec<PointMass>, CombineError> {
    points
        .chunks_exact(2)
        .map(|pair| pair[0].combine(&pair[1]))
        .collect()
}

/// Perform one round over `points`, carrying an odd trailing element.
///
/// The output has `ceil(points.len() / 2)` elements: the pair results in
/// pair order, then the carried element if there is one.
pub fn pairwise_round(points: &[PointMass]) -> Result<Vec<PointMass>, CombineError> {
    let paired = points.len() - points.len() % 2;
    let (pairs, carry) = points.split_at(paired);
    let mut next = Vec::with_capacity(points.len().div_ceil(2));
    for pair in pairs.chunks_exact(2) {
        next.push(pair[0].combine(&pair[1])?);
    }
    next.extend_from_slice(carry);
    Ok(next)
}

// ── Entry points ──────────────────────────────────────────────────

/// Reduce on the calling thread.
pub fn reduce_sequential(points: Vec<PointMass>) -> Result<Reduced, ReduceError> {
    check_input(&points)?;
    let start = Instant::now();
    let mut metrics = ReduceMetrics {
        input_len: points.len(),
        ..ReduceMetrics::default()
    };

    let mut current = points;
    while current.len() > 1 {
        let round = metrics.rounds + 1;
        let pairs = current.len() / 2;
        current = pairwise_round(&current)
            .map_err(|source| ReduceError::DegenerateCombination { round, source })?;
        metrics.rounds = round;
        metrics.combinations += pairs as u64;
        metrics.round_sizes.push(current.len());
    }

    metrics.elapsed_us = elapsed_us(start);
    Ok(Reduced {
        barycenter: current[0],
        metrics,
    })
}

type ChunkResult = Result<Vec<PointMass>, CombineError>;

/// Record one drained chunk. The first failure observed wins.
fn settle(
    done: Completed<ChunkResult>,
    slots: &mut [Option<Vec<PointMass>>],
    failure: &mut Option<CombineError>,
) {
    match done.output {
        Ok(combined) => slots[done.seq] = Some(combined),
        Err(e) => {
            failure.get_or_insert(e);
        }
    }
}

/// Reduce with the pairs of each round spread over the worker pool in
/// chunks of `config.reduce_chunk_pairs` pairs.
///
/// Produces bit-identical output to [`reduce_sequential`].
pub fn reduce_concurrent(
    points: Vec<PointMass>,
    config: &EngineConfig,
) -> Result<Reduced, ReduceError> {
    check_input(&points)?;
    let start = Instant::now();
    let chunk_len = config.reduce_chunk_pairs.max(1) * 2;
    let mut metrics = ReduceMetrics {
        input_len: points.len(),
        ..ReduceMetrics::default()
    };

    let barycenter = pool::with_pool(
        &config.pool,
        |chunk: Vec<PointMass>| combine_pairs(&chunk),
        |dispatcher| -> Result<PointMass, ReduceError> {
            let mut current = points;
            while current.len() > 1 {
                let round = metrics.rounds + 1;
                let paired = current.len() - current.len() % 2;
                let (pairs, carry) = current.split_at(paired);
                let chunk_count = pairs.len().div_ceil(chunk_len);
                let mut slots: Vec<Option<Vec<PointMass>>> = vec![None; chunk_count];
                let mut failure = None;

                for (seq, chunk) in pairs.chunks(chunk_len).enumerate() {
                    if let Some(done) = dispatcher.submit(seq, chunk.to_vec())? {
                        settle(done, &mut slots, &mut failure);
                    }
                    if failure.is_some() {
                        break;
                    }
                }
                // The round is complete only once every dispatched chunk
                // is back, including after a failure.
                while let Some(done) = dispatcher.next_completed()? {
                    settle(done, &mut slots, &mut failure);
                }
                if let Some(source) = failure {
                    return Err(ReduceError::DegenerateCombination { round, source });
                }

                let mut next = Vec::with_capacity(current.len().div_ceil(2));
                for slot in slots {
                    let Some(combined) = slot else {
                        return Err(ReduceError::Pool(PoolError::WorkersLost));
                    };
                    next.extend(combined);
                }
                next.extend_from_slice(carry);

                metrics.rounds = round;
                metrics.combinations += (paired / 2) as u64;
                metrics.round_sizes.push(next.len());
                current = next;
            }
            metrics.tasks_dispatched = dispatcher.dispatched();
            Ok(current[0])
        },
    )??;

    metrics.elapsed_us = elapsed_us(start);
    Ok(Reduced {
        barycenter,
        metrics,
    })
}

/// Single-pass weighted accumulation over every point.
///
/// Reference strategy for cross-checking the pairwise engine. Agrees
/// with it up to floating-point rounding, not bit-for-bit.
pub fn reduce_linear(points: &[PointMass]) -> Result<Reduced, ReduceError> {
    check_input(points)?;
    let start = Instant::now();
    let mut sum = WeightedSum::new();
    for p in points {
        sum.push(p)
            .map_err(|source| ReduceError::DegenerateCombination { round: 1, source })?;
    }
    let barycenter = sum
        .finish()
        .ok_or(ReduceError::InsufficientData { count: 0 })?;

    let mut metrics = ReduceMetrics {
        input_len: points.len(),
        rounds: 1,
        combinations: sum.count() as u64,
        ..ReduceMetrics::default()
    };
    metrics.round_sizes.push(1);
    metrics.elapsed_us = elapsed_us(start);
    Ok(Reduced {
        barycenter,
        metrics,
    })
}
