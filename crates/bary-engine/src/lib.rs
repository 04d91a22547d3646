//! Ingestion and reduction engine for bary.
//!
//! Provides the [`BarycenterEngine`] that reads `X:Y:Z:MASS` records from
//! a stream and reduces them to a single barycenter through rounds of
//! pairwise weighted averaging. Both stages run either on the calling
//! thread or on a bounded worker pool; the pairwise result is
//! bit-identical either way.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod pool;
pub mod reduce;

pub use config::{ConfigError, EngineConfig, ExecutionMode, PoolConfig, Strategy};
pub use engine::{BarycenterEngine, RunError, RunReport};
pub use ingest::{ingest_concurrent, ingest_sequential, IngestError, Ingested};
pub use metrics::{IngestMetrics, ReduceMetrics, RoundSizes};
pub use pool::PoolError;
pub use reduce::{
    pairwise_round, reduce_concurrent, reduce_linear, reduce_sequential, round_count,
    ReduceError, Reduced,
};
