//! Report lines printed by the `bary` binary.
//!
//! Kept separate from the binary so the wording is testable. Durations
//! use `Duration`'s debug form (`1.5ms`, `230µs`).

use std::time::Duration;

use bary_core::PointMass;
use bary_engine::{IngestMetrics, ReduceMetrics, RunReport};

/// `Loaded N values from file in D.`
pub fn loaded_line(ingest: &IngestMetrics) -> String {
    format!(
        "Loaded {} values from file in {:?}.",
        ingest.points_loaded,
        Duration::from_micros(ingest.elapsed_us)
    )
}

/// `System barycenter is at (x, y, z) and the system's mass is m.`
pub fn barycenter_line(barycenter: &PointMass) -> String {
    format!(
        "System barycenter is at ({:.6}, {:.6}, {:.6}) and the system's mass is {:.6}.",
        barycenter.x(),
        barycenter.y(),
        barycenter.z(),
        barycenter.mass()
    )
}

/// `Calculation took D.`
pub fn calculation_line(reduce: &ReduceMetrics) -> String {
    format!(
        "Calculation took {:?}.",
        Duration::from_micros(reduce.elapsed_us)
    )
}

/// All three lines of a successful run, newline-separated.
pub fn run_summary(report: &RunReport) -> String {
    format!(
        "{}\n{}\n{}",
        loaded_line(&report.ingest),
        barycenter_line(&report.barycenter),
        calculation_line(&report.reduce)
    )
}
