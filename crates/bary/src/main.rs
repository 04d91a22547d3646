//! bary command-line interface.
//!
//! Usage:
//!     bary run bodies.txt
//!     bary run bodies.txt --ingest sequential --reduce concurrent --workers 8
//!     bary generate 1000000 --seed 7 > bodies.txt

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use bary::engine::{BarycenterEngine, EngineConfig, ExecutionMode, PoolConfig, RunError, Strategy};
use bary::gen::{write_records, GeneratorConfig, DEFAULT_MASS_BOUND, DEFAULT_POSITION_BOUND};
use bary::report;

/// Barycenter and total mass of a point-mass record file
#[derive(Parser)]
#[command(name = "bary")]
#[command(version)]
#[command(about = "Pairwise barycenter of X:Y:Z:MASS records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the barycenter of a record file
    Run {
        /// Record file, one X:Y:Z:MASS record per line
        file: PathBuf,

        /// How records are parsed
        #[arg(long, value_enum, default_value_t = Mode::Concurrent)]
        ingest: Mode,

        /// How pairwise rounds are executed
        #[arg(long, value_enum, default_value_t = Mode::Concurrent)]
        reduce: Mode,

        /// Reduction strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Pairwise)]
        strategy: StrategyArg,

        /// Worker threads (defaults to available parallelism)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Maximum tasks in flight (defaults to four per worker)
        #[arg(long)]
        in_flight: Option<usize>,

        /// Lines per concurrent ingestion task
        #[arg(long, default_value = "256")]
        batch_lines: usize,

        /// Pairs per concurrent reduction task
        #[arg(long, default_value = "512")]
        chunk_pairs: usize,
    },

    /// Write synthetic records to stdout
    Generate {
        /// Number of records
        count: u64,

        /// Coordinates fall in [-B, B)
        #[arg(long, default_value_t = DEFAULT_POSITION_BOUND)]
        position_bound: i64,

        /// Masses fall in [1, M)
        #[arg(long, default_value_t = DEFAULT_MASS_BOUND)]
        mass_bound: i64,

        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Sequential,
    Concurrent,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => ExecutionMode::Sequential,
            Mode::Concurrent => ExecutionMode::Concurrent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Pairwise,
    Linear,
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Pairwise => Strategy::Pairwise,
            StrategyArg::Linear => Strategy::Linear,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            ingest,
            reduce,
            strategy,
            workers,
            in_flight,
            batch_lines,
            chunk_pairs,
        } => {
            let config = EngineConfig {
                ingest_mode: ingest.into(),
                reduce_mode: reduce.into(),
                strategy: strategy.into(),
                pool: PoolConfig {
                    worker_count: workers,
                    max_in_flight: in_flight,
                },
                ingest_batch_lines: batch_lines,
                reduce_chunk_pairs: chunk_pairs,
            };
            run(file, config)
        }
        Commands::Generate {
            count,
            position_bound,
            mass_bound,
            seed,
        } => {
            let config = GeneratorConfig {
                count,
                position_bound,
                mass_bound,
                seed: seed.unwrap_or_else(clock_seed),
            };
            let stdout = io::stdout();
            write_records(&config, BufWriter::new(stdout.lock()))?;
            Ok(())
        }
    }
}

fn run(path: PathBuf, config: EngineConfig) -> Result<()> {
    let engine = BarycenterEngine::new(config).context("invalid engine configuration")?;
    let file =
        File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;

    match engine.run(BufReader::new(file)) {
        Ok(report) => {
            println!("{}", report::run_summary(&report));
            Ok(())
        }
        Err(RunError::Reduce { ingest, source }) => {
            // Loading succeeded; report it before the failure.
            println!("{}", report::loaded_line(&ingest));
            Err(source).with_context(|| format!("no barycenter for {}", path.display()))
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
