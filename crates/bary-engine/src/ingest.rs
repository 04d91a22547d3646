//! Ingestion stage: record stream in, point-mass collection out.
//!
//! Both modes read the stream one newline-delimited record at a time and
//! drop records that fail to parse. Only the aggregate counts in
//! [`IngestMetrics`] reveal how many were dropped.
//!
//! The concurrent mode groups lines into [`LineBatch`]es and parses them
//! on the worker pool. The orchestrating thread reads, dispatches, and
//! drains; ingestion finishes once end-of-stream has been reached and
//! every dispatched batch has been drained. The resulting collection is
//! a multiset, so batch completion order does not matter.

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead};
use std::time::Instant;

use bary_core::{parse_record, PointMass};

use crate::config::EngineConfig;
use crate::metrics::{elapsed_us, IngestMetrics};
use crate::pool::{self, PoolError};

// ── IngestError ───────────────────────────────────────────────────

/// Fatal ingestion failures. Malformed records never appear here.
#[derive(Debug)]
pub enum IngestError {
    /// Reading the stream failed.
    Io(io::Error),
    /// The worker pool failed.
    Pool(PoolError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "reading records: {e}"),
            Self::Pool(e) => write!(f, "parse pool: {e}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Pool(e) => Some(e),
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PoolError> for IngestError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

// ── Ingested ──────────────────────────────────────────────────────

/// Output of the ingestion stage.
#[derive(Clone, Debug)]
pub struct Ingested {
    /// Every successfully parsed point. Order is unspecified in
    /// concurrent mode.
    pub points: Vec<PointMass>,
    /// Counts and timing.
    pub metrics: IngestMetrics,
}

// ── Line handling ─────────────────────────────────────────────────

/// Strip one trailing `\n` and then one trailing `\r`, decode, and parse.
/// Any failure, including invalid UTF-8, rejects just this record.
fn parse_line(raw: &[u8]) -> Option<PointMass> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw)
        .ok()
        .and_then(|line| parse_record(line).ok())
}

/// A run of raw lines, each terminated by `\n`, stored contiguously.
#[derive(Debug, Default)]
struct LineBatch {
    bytes: Vec<u8>,
    lines: usize,
}

/// Points parsed from one [`LineBatch`].
#[derive(Debug)]
struct ParsedBatch {
    points: Vec<PointMass>,
}

/// Read up to `max_lines` lines. The flag is true once end-of-stream
/// has been reached.
fn read_batch<R: BufRead>(reader: &mut R, max_lines: usize) -> io::Result<(LineBatch, bool)> {
    let mut batch = LineBatch::default();
    while batch.lines < max_lines {
        let n = reader.read_until(b'\n', &mut batch.bytes)?;
        if n == 0 {
            return Ok((batch, true));
        }
        if batch.bytes.last() != Some(&b'\n') {
            batch.bytes.push(b'\n');
        }
        batch.lines += 1;
    }
    Ok((batch, false))
}

fn parse_batch(batch: LineBatch) -> ParsedBatch {
    let points = batch
        .bytes
        .split(|&b| b == b'\n')
        .take(batch.lines)
        .filter_map(parse_line)
        .collect();
    ParsedBatch { points }
}

fn finish(points: Vec<PointMass>, lines_read: u64, tasks: u64, start: Instant) -> Ingested {
    let loaded = points.len() as u64;
    Ingested {
        metrics: IngestMetrics {
            lines_read,
            points_loaded: loaded,
            records_rejected: lines_read - loaded,
            tasks_dispatched: tasks,
            elapsed_us: elapsed_us(start),
        },
        points,
    }
}

// ── Entry points ──────────────────────────────────────────────────

/// Parse every record on the calling thread, in arrival order.
pub fn ingest_sequential<R: BufRead>(mut reader: R) -> Result<Ingested, IngestError> {
    let start = Instant::now();
    let mut points = Vec::new();
    let mut lines_read = 0u64;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines_read += 1;
        if let Some(p) = parse_line(&buf) {
            points.push(p);
        }
    }
    Ok(finish(points, lines_read, 0, start))
}

/// Parse records on the worker pool described by `config.pool`, in
/// batches of `config.ingest_batch_lines` lines.
pub fn ingest_concurrent<R: BufRead>(
    mut reader: R,
    config: &EngineConfig,
) -> Result<Ingested, IngestError> {
    let start = Instant::now();
    let batch_lines = config.ingest_batch_lines.max(1);

    let (points, lines_read, tasks) = pool::with_pool(
        &config.pool,
        parse_batch,
        |dispatcher| -> Result<(Vec<PointMass>, u64, u64), IngestError> {
            let mut points = Vec::new();
            let mut lines_read = 0u64;
            let mut seq = 0usize;
            let mut end_of_stream = false;

            while !end_of_stream {
                let (batch, eof) = read_batch(&mut reader, batch_lines)?;
                end_of_stream = eof;
                if batch.lines == 0 {
                    continue;
                }
                lines_read += batch.lines as u64;
                if let Some(done) = dispatcher.submit(seq, batch)? {
                    points.extend(done.output.points);
                }
                seq += 1;
            }

            // End of stream reached; now wait for drained == dispatched.
            while let Some(done) = dispatcher.next_completed()? {
                points.extend(done.output.points);
            }
            debug_assert_eq!(dispatcher.drained(), dispatcher.dispatched());
            Ok((points, lines_read, dispatcher.dispatched()))
        },
    )??;

    Ok(finish(points, lines_read, tasks, start))
}
