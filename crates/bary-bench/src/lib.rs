//! Benchmark profiles for the bary barycenter engine.
//!
//! Provides pre-built inputs and engine configurations:
//!
//! - [`reference_records`]: 100K generated records as raw bytes
//! - [`stress_records`]: 1M generated records as raw bytes
//! - [`profile_config`]: engine configuration for a mode and worker count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bary_core::PointMass;
use bary_engine::{EngineConfig, ExecutionMode, PoolConfig};
use bary_gen::{write_records, Generator, GeneratorConfig};

/// Record count of the reference profile.
pub const REFERENCE_COUNT: u64 = 100_000;

/// Record count of the stress profile.
pub const STRESS_COUNT: u64 = 1_000_000;

/// `count` generated records in `X:Y:Z:MASS` form.
pub fn generated_records(count: u64, seed: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_records(&GeneratorConfig::new(count, seed), &mut buf)
        .expect("writing to a Vec cannot fail with default bounds");
    buf
}

/// 100K records with the default bounds.
pub fn reference_records(seed: u64) -> Vec<u8> {
    generated_records(REFERENCE_COUNT, seed)
}

/// 1M records with the default bounds.
pub fn stress_records(seed: u64) -> Vec<u8> {
    generated_records(STRESS_COUNT, seed)
}

/// `count` generated points, already parsed.
pub fn generated_points(count: u64, seed: u64) -> Vec<PointMass> {
    Generator::new(&GeneratorConfig::new(count, seed))
        .expect("default bounds are valid")
        .collect()
}

/// Engine configuration running both stages in `mode` on `workers` threads.
pub fn profile_config(mode: ExecutionMode, workers: usize) -> EngineConfig {
    EngineConfig {
        ingest_mode: mode,
        reduce_mode: mode,
        pool: PoolConfig {
            worker_count: Some(workers),
            max_in_flight: None,
        },
        ..EngineConfig::default()
    }
}
