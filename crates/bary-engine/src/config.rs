//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] selects how each stage executes and sizes the shared
//! worker pool. [`validate()`](EngineConfig::validate) checks structural
//! invariants before any thread is spawned.

use std::error::Error;
use std::fmt;

// ── ExecutionMode / Strategy ───────────────────────────────────────

/// How a stage schedules its work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Everything runs on the calling thread, in arrival order.
    Sequential,
    /// Work is fanned out to the bounded worker pool.
    #[default]
    Concurrent,
}

/// How the loaded points are reduced to a single barycenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Repeated rounds of pairwise weighted averaging.
    #[default]
    Pairwise,
    /// One weighted accumulation over every point. Always sequential;
    /// kept as a reference for cross-checking the pairwise engine.
    Linear,
}

// ── PoolConfig ─────────────────────────────────────────────────────

/// Sizing for the worker pool used by concurrent stages.
#[derive(Clone, Debug, Default)]
pub struct PoolConfig {
    /// Number of worker threads. `None` = auto-detect from
    /// `available_parallelism`.
    pub worker_count: Option<usize>,
    /// Maximum number of dispatched-but-undrained tasks. `None` = four
    /// per worker.
    pub max_in_flight: Option<usize>,
}

impl PoolConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Both explicit and detected values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 64),
        }
    }

    /// Resolve the in-flight cap. Explicit zero is rejected by
    /// [`EngineConfig::validate`]; here it is raised to 1.
    pub fn resolved_max_in_flight(&self) -> usize {
        match self.max_in_flight {
            Some(n) => n.max(1),
            None => self.resolved_worker_count() * 4,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `ingest_batch_lines` is zero.
    ZeroBatchLines,
    /// `reduce_chunk_pairs` is zero.
    ZeroChunkPairs,
    /// `pool.max_in_flight` was set explicitly to zero.
    ZeroInFlight,
    /// `pool.worker_count` was set explicitly to zero.
    ZeroWorkers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBatchLines => write!(f, "ingest_batch_lines must be at least 1"),
            Self::ZeroChunkPairs => write!(f, "reduce_chunk_pairs must be at least 1"),
            Self::ZeroInFlight => write!(f, "max_in_flight must be at least 1"),
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for a [`BarycenterEngine`](crate::BarycenterEngine).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Execution mode of the ingestion stage. Default: concurrent.
    pub ingest_mode: ExecutionMode,
    /// Execution mode of the pairwise reduction. Default: concurrent.
    pub reduce_mode: ExecutionMode,
    /// Reduction strategy. Default: pairwise.
    pub strategy: Strategy,
    /// Worker pool sizing shared by both concurrent stages.
    pub pool: PoolConfig,
    /// Lines per ingestion task. 1 dispatches every line on its own.
    /// Default: 256.
    pub ingest_batch_lines: usize,
    /// Pairs per reduction task within a round. Default: 512.
    pub reduce_chunk_pairs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ingest_mode: ExecutionMode::Concurrent,
            reduce_mode: ExecutionMode::Concurrent,
            strategy: Strategy::Pairwise,
            pool: PoolConfig::default(),
            ingest_batch_lines: 256,
            reduce_chunk_pairs: 512,
        }
    }
}

impl EngineConfig {
    /// A fully sequential configuration.
    pub fn sequential() -> Self {
        Self {
            ingest_mode: ExecutionMode::Sequential,
            reduce_mode: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest_batch_lines == 0 {
            return Err(ConfigError::ZeroBatchLines);
        }
        if self.reduce_chunk_pairs == 0 {
            return Err(ConfigError::ZeroChunkPairs);
        }
        if self.pool.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.pool.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroInFlight);
        }
        Ok(())
    }
}
