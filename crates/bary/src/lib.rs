//! bary: barycenter and total mass of a point-mass record file.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the bary sub-crates, plus the report formatting used by the `bary`
//! binary.
//!
//! # Quick start
//!
//! ```rust
//! use bary::prelude::*;
//!
//! let engine = BarycenterEngine::new(EngineConfig::default()).unwrap();
//! let report = engine.run("0:0:0:1\n10:0:0:3\n".as_bytes()).unwrap();
//! assert_eq!(report.barycenter, PointMass::new(7.5, 0.0, 0.0, 4.0));
//! assert_eq!(report.ingest.points_loaded, 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `bary-core` | `PointMass`, combinator, record parser |
//! | [`engine`] | `bary-engine` | Ingestion, reduction, worker pool, config, metrics |
//! | [`gen`] | `bary-gen` | Seeded synthetic record generator |
//! | [`report`] | `bary` | Human-readable report lines |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Point-mass values, combination, and parsing (`bary-core`).
pub use bary_core as core;

/// Ingestion and reduction engine (`bary-engine`).
pub use bary_engine as engine;

/// Synthetic data generator (`bary-gen`).
pub use bary_gen as gen;

pub mod report;

/// Common imports for driving the engine.
pub mod prelude {
    pub use bary_core::{parse_record, CombineError, ParseError, PointMass};
    pub use bary_engine::{
        BarycenterEngine, EngineConfig, ExecutionMode, IngestMetrics, PoolConfig, ReduceError,
        ReduceMetrics, RunError, RunReport, Strategy,
    };
    pub use bary_gen::{write_records, Generator, GeneratorConfig};
}
