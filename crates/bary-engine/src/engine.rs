//! [`BarycenterEngine`]: ingest a record stream and reduce it to one point.
//!
//! The engine is the boundary the command-line collaborator talks to. It
//! validates its configuration once, dispatches each stage to the mode the
//! configuration selects, and raises insufficient data exactly once,
//! after ingestion and before any reduction work is scheduled.

use std::error::Error;
use std::fmt;
use std::io::BufRead;

use bary_core::PointMass;

use crate::config::{ConfigError, EngineConfig, ExecutionMode, Strategy};
use crate::ingest::{self, IngestError, Ingested};
use crate::metrics::{IngestMetrics, ReduceMetrics};
use crate::reduce::{self, ReduceError, Reduced};

// ── RunError ──────────────────────────────────────────────────────

/// Fatal outcome of [`BarycenterEngine::run`].
#[derive(Debug)]
pub enum RunError {
    /// The ingestion stage failed.
    Ingest(IngestError),
    /// The reduction failed, including the insufficient-data check.
    Reduce {
        /// Ingestion metrics, still reportable after a failed reduction.
        ingest: IngestMetrics,
        /// The underlying reduction error.
        source: ReduceError,
    },
}

impl RunError {
    /// The reduction error, if the run got that far.
    pub fn reduce_error(&self) -> Option<&ReduceError> {
        match self {
            Self::Reduce { source, .. } => Some(source),
            Self::Ingest(_) => None,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingest(e) => write!(f, "ingestion failed: {e}"),
            Self::Reduce { source, .. } => write!(f, "reduction failed: {source}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ingest(e) => Some(e),
            Self::Reduce { source, .. } => Some(source),
        }
    }
}

impl From<IngestError> for RunError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ── RunReport ─────────────────────────────────────────────────────

/// Everything the reporting collaborator needs after a successful run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Ingestion counts and timing.
    pub ingest: IngestMetrics,
    /// Reduction counts and timing.
    pub reduce: ReduceMetrics,
    /// Barycenter and total mass of every loaded point.
    pub barycenter: PointMass,
}

// ── BarycenterEngine ──────────────────────────────────────────────

/// Configured ingestion and reduction pipeline.
#[derive(Clone, Debug)]
pub struct BarycenterEngine {
    config: EngineConfig,
}

impl BarycenterEngine {
    /// Validate `config` and build an engine.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the ingestion stage in the configured mode.
    pub fn ingest<R: BufRead>(&self, reader: R) -> Result<Ingested, IngestError> {
        match self.config.ingest_mode {
            ExecutionMode::Sequential => ingest::ingest_sequential(reader),
            ExecutionMode::Concurrent => ingest::ingest_concurrent(reader, &self.config),
        }
    }

    /// Reduce `points` with the configured strategy and mode.
    ///
    /// The linear strategy ignores `reduce_mode`.
    pub fn reduce(&self, points: Vec<PointMass>) -> Result<Reduced, ReduceError> {
        match (self.config.strategy, self.config.reduce_mode) {
            (Strategy::Linear, _) => reduce::reduce_linear(&points),
            (Strategy::Pairwise, ExecutionMode::Sequential) => reduce::reduce_sequential(points),
            (Strategy::Pairwise, ExecutionMode::Concurrent) => {
                reduce::reduce_concurrent(points, &self.config)
            }
        }
    }

    /// Ingest `reader`, then reduce everything it yielded.
    ///
    /// Fails with [`ReduceError::InsufficientData`] if fewer than two
    /// points were loaded; no reduction work is scheduled in that case.
    pub fn run<R: BufRead>(&self, reader: R) -> Result<RunReport, RunError> {
        let Ingested { points, metrics } = self.ingest(reader)?;
        if points.len() < 2 {
            return Err(RunError::Reduce {
                ingest: metrics,
                source: ReduceError::InsufficientData {
                    count: points.len(),
                },
            });
        }
        let reduced = self.reduce(points).map_err(|source| RunError::Reduce {
            ingest: metrics.clone(),
            source,
        })?;
        Ok(RunReport {
            ingest: metrics,
            reduce: reduced.metrics,
            barycenter: reduced.barycenter,
        })
    }
}
