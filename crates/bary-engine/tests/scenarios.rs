//! End-to-end scenarios: record text in, barycenter or failure out.
//!
//! Every scenario runs under both the fully sequential and the fully
//! concurrent configuration and must give the same answer.

use bary_core::CombineError;
use bary_engine::{
    BarycenterEngine, EngineConfig, ExecutionMode, PoolConfig, ReduceError, RunError, RunReport,
};
use bary_test_utils::{assert_bit_identical, failing_reader, pm, sorted_by_bits};

// ── Helpers ─────────────────────────────────────────────────────

fn configs() -> Vec<EngineConfig> {
    vec![
        EngineConfig::sequential(),
        EngineConfig {
            ingest_batch_lines: 1,
            reduce_chunk_pairs: 1,
            pool: PoolConfig {
                worker_count: Some(4),
                max_in_flight: Some(2),
            },
            ..EngineConfig::default()
        },
        EngineConfig::default(),
    ]
}

fn run_all(input: &str) -> Vec<Result<RunReport, RunError>> {
    configs()
        .into_iter()
        .map(|cfg| BarycenterEngine::new(cfg).unwrap().run(input.as_bytes()))
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn two_unit_masses() {
    for report in run_all("0:0:0:1\n10:0:0:1\n") {
        let report = report.unwrap();
        assert_eq!(report.barycenter, pm(5.0, 0.0, 0.0, 2.0));
        assert_eq!(report.ingest.points_loaded, 2);
    }
}

#[test]
fn weighted_pair() {
    for report in run_all("0:0:0:1\n10:0:0:3\n") {
        let report = report.unwrap();
        assert_eq!(report.barycenter.x(), 7.5);
        assert_eq!(report.barycenter.mass(), 4.0);
    }
}

#[test]
fn malformed_line_is_absorbed() {
    for report in run_all("0:0:0:1\nabc\n10:0:0:1\n") {
        let report = report.unwrap();
        assert_eq!(report.ingest.points_loaded, 2);
        assert_eq!(report.ingest.records_rejected, 1);
        assert_eq!(report.barycenter, pm(5.0, 0.0, 0.0, 2.0));
    }
}

#[test]
fn single_valid_line_is_insufficient() {
    for result in run_all("garbage\n3:4:5:6\n\n") {
        let err = result.unwrap_err();
        assert_eq!(
            err.reduce_error(),
            Some(&ReduceError::InsufficientData { count: 1 })
        );
    }
}

#[test]
fn empty_input_is_insufficient() {
    for result in run_all("") {
        assert_eq!(
            result.unwrap_err().reduce_error(),
            Some(&ReduceError::InsufficientData { count: 0 })
        );
    }
}

#[test]
fn five_equal_masses_carry_forward() {
    let input = "0:0:0:1\n1:0:0:1\n2:0:0:1\n3:0:0:1\n4:0:0:1\n";
    let engine = BarycenterEngine::new(EngineConfig::sequential()).unwrap();
    let report = engine.run(input.as_bytes()).unwrap();
    assert_eq!(report.reduce.round_sizes.as_slice(), &[3, 2, 1]);
    assert_eq!(report.reduce.rounds, 3);
    assert_eq!(report.barycenter.mass(), 5.0);
    // ((0,1),(2,3),4) -> ((0.5@2, 2.5@2), 4@1) -> (1.5@4, 4@1) -> 2@5
    assert_eq!(report.barycenter.x(), 2.0);
}

#[test]
fn negative_mass_record_is_rejected_not_combined() {
    for report in run_all("0:0:0:1\n5:5:5:-3\n10:0:0:1\n") {
        let report = report.unwrap();
        assert_eq!(report.ingest.points_loaded, 2);
        assert_eq!(report.barycenter, pm(5.0, 0.0, 0.0, 2.0));
    }
}

#[test]
fn read_failure_surfaces_as_ingest_error() {
    for cfg in configs() {
        let engine = BarycenterEngine::new(cfg).unwrap();
        let err = engine
            .run(failing_reader("0:0:0:1\n1:1:1:1\n"))
            .unwrap_err();
        assert!(matches!(err, RunError::Ingest(_)), "got {err}");
        assert!(err.reduce_error().is_none());
    }
}

#[test]
fn mixed_modes_agree_bit_for_bit() {
    let input = "1:2:3:1\n-4:5:6:2\n7:-8:9:3\n10:11:-12:4\n0.1:0.2:0.3:0.7\n";
    let mut results = Vec::new();
    for ingest_mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
        for reduce_mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
            let engine = BarycenterEngine::new(EngineConfig {
                ingest_mode,
                reduce_mode,
                ingest_batch_lines: 1,
                reduce_chunk_pairs: 1,
                ..EngineConfig::default()
            })
            .unwrap();
            // Concurrent ingestion order is unspecified; fix it before reducing.
            let ingested = engine.ingest(input.as_bytes()).unwrap();
            assert_eq!(ingested.metrics.points_loaded, 5);
            let points = sorted_by_bits(ingested.points);
            results.push(engine.reduce(points).unwrap().barycenter);
        }
    }
    for other in &results[1..] {
        assert_bit_identical(&results[0], other);
    }
}

#[test]
fn overflowing_records_abort_instead_of_reporting_nan() {
    for input in [
        "1:0:0:1e308\n3:0:0:1e308\n",
        "1e300:0:0:1e10\n-1e300:0:0:1e10\n",
    ] {
        for report in run_all(input) {
            let err = report.unwrap_err();
            assert!(
                matches!(
                    err.reduce_error(),
                    Some(ReduceError::DegenerateCombination {
                        round: 1,
                        source: CombineError::NonFiniteResult { .. }
                    })
                ),
                "got {err}"
            );
        }
    }
}
