//! Bounded worker pool shared by concurrent ingestion and reduction.
//!
//! ```text
//! Orchestrator (caller thread)                 Workers (N)
//!     |                                            |
//!     |--submit(seq, payload)--------------------->| task_rx.recv()
//!     |   [task_tx: bounded(max_in_flight)]        | job(payload)
//!     |                                            |
//!     |<--next_completed()-------------------------| result_tx.send()
//!     |   [result_rx: bounded(max_in_flight)]      |
//!     |                                            |
//!     | drop(dispatcher) closes task channel ----->| loop exits
//! ```
//!
//! The orchestrator is the single drainer. It never has more than
//! `max_in_flight` tasks outstanding: [`Dispatcher::submit`] at capacity
//! first drains one completion. Neither channel can therefore fill up
//! while its peer is blocked, and completion is exact: a stage is done
//! when its input is exhausted and `drained == dispatched`.
//!
//! Workers receive owned payloads and return owned outputs. Nothing they
//! touch is shared except the two channels.

use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::config::PoolConfig;

// ── PoolError ─────────────────────────────────────────────────────

/// Failures of the worker pool itself (never of the work it runs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A worker thread could not be spawned.
    SpawnFailed {
        /// OS error description.
        reason: String,
    },
    /// A job panicked while processing the task with this sequence number.
    WorkerPanicked {
        /// Sequence number of the task that panicked.
        seq: usize,
    },
    /// Every worker is gone while tasks are still outstanding.
    WorkersLost,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed { reason } => write!(f, "worker spawn failed: {reason}"),
            Self::WorkerPanicked { seq } => write!(f, "worker panicked on task {seq}"),
            Self::WorkersLost => write!(f, "all workers exited with tasks outstanding"),
        }
    }
}

impl Error for PoolError {}

// ── Messages ──────────────────────────────────────────────────────

struct Task<T> {
    seq: usize,
    payload: T,
}

struct Reply<R> {
    seq: usize,
    /// `Err` if the job panicked.
    output: Result<R, ()>,
}

/// A drained task result, tagged with the sequence number it was
/// submitted under.
#[derive(Debug)]
pub(crate) struct Completed<R> {
    pub(crate) seq: usize,
    pub(crate) output: R,
}

// ── Dispatcher ────────────────────────────────────────────────────

/// Orchestrator handle: submits tasks and drains their results.
///
/// Dropping the dispatcher closes the task channel, which is the signal
/// for every worker to exit.
pub(crate) struct Dispatcher<T, R> {
    task_tx: Sender<Task<T>>,
    result_rx: Receiver<Reply<R>>,
    capacity: usize,
    dispatched: u64,
    drained: u64,
}

impl<T, R> Dispatcher<T, R> {
    /// Tasks dispatched and not yet drained.
    pub(crate) fn in_flight(&self) -> usize {
        (self.dispatched - self.drained) as usize
    }

    /// Total tasks dispatched so far.
    pub(crate) fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Total results drained so far.
    pub(crate) fn drained(&self) -> u64 {
        self.drained
    }

    /// Submit a task. If `max_in_flight` tasks are already outstanding,
    /// blocks until one completes and returns that completion.
    pub(crate) fn submit(
        &mut self,
        seq: usize,
        payload: T,
    ) -> Result<Option<Completed<R>>, PoolError> {
        let completed = if self.in_flight() >= self.capacity {
            self.next_completed()?
        } else {
            None
        };
        self.task_tx
            .send(Task { seq, payload })
            .map_err(|_| PoolError::WorkersLost)?;
        self.dispatched += 1;
        Ok(completed)
    }

    /// Block until the next outstanding task completes. Returns `None`
    /// when nothing is in flight.
    pub(crate) fn next_completed(&mut self) -> Result<Option<Completed<R>>, PoolError> {
        if self.in_flight() == 0 {
            return Ok(None);
        }
        let reply = self.result_rx.recv().map_err(|_| PoolError::WorkersLost)?;
        self.drained += 1;
        match reply.output {
            Ok(output) => Ok(Some(Completed {
                seq: reply.seq,
                output,
            })),
            Err(()) => Err(PoolError::WorkerPanicked { seq: reply.seq }),
        }
    }
}

// ── Pool lifecycle ────────────────────────────────────────────────

/// Spawn a scoped worker pool running `job`, hand a [`Dispatcher`] to
/// `body`, and join every worker before returning `body`'s output.
pub(crate) fn with_pool<T, R, J, B, O>(config: &PoolConfig, job: J, body: B) -> Result<O, PoolError>
where
    T: Send,
    R: Send,
    J: Fn(T) -> R + Sync,
    B: FnOnce(&mut Dispatcher<T, R>) -> O,
{
    let workers = config.resolved_worker_count();
    let capacity = config.resolved_max_in_flight();
    let (task_tx, task_rx) = crossbeam_channel::bounded::<Task<T>>(capacity);
    let (result_tx, result_rx) = crossbeam_channel::bounded::<Reply<R>>(capacity);
    let job = &job;

    thread::scope(|scope| {
        let mut dispatcher = Dispatcher {
            task_tx,
            result_rx,
            capacity,
            dispatched: 0,
            drained: 0,
        };
        for i in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("bary-worker-{i}"))
                .spawn_scoped(scope, move || worker_loop(task_rx, result_tx, job));
            if let Err(e) = spawned {
                // Closing the task channel lets already-spawned workers exit
                // before the scope joins them.
                drop(dispatcher);
                return Err(PoolError::SpawnFailed {
                    reason: e.to_string(),
                });
            }
        }
        // Only workers may hold result senders, so a disconnected result
        // channel means every worker is gone.
        drop(result_tx);
        drop(task_rx);
        Ok(body(&mut dispatcher))
    })
}

/// Runs until the task channel is closed or the orchestrator stops
/// listening for results.
fn worker_loop<T, R, J>(task_rx: Receiver<Task<T>>, result_tx: Sender<Reply<R>>, job: &J)
where
    J: Fn(T) -> R,
{
    while let Ok(task) = task_rx.recv() {
        let Task { seq, payload } = task;
        let output = panic::catch_unwind(AssertUnwindSafe(|| job(payload))).map_err(|_| ());
        if result_tx.send(Reply { seq, output }).is_err() {
            break;
        }
    }
}
