use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use matrix::{Block, Matrix, MatrixError};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    task::JoinSet,
    time,
};
use wire::Message;

use crate::{
    CoordinatorError, Result,
    metrics::JobMetrics,
    pool::{WorkerHandle, WorkerPool, WorkerState},
};

/// One multiplication request: `c = a * b`, distributed over whichever
/// workers are idle in the pool when the job runs.
#[derive(Debug, Clone)]
pub struct Job {
    pub a: Matrix,
    pub b: Matrix,
}

/// Per-job knobs.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Compute the sequential product as a comparison baseline. Pure
    /// overhead as far as the distributed result is concerned, so it can
    /// be turned off; speedup and the equality check are then absent.
    pub baseline: bool,
    /// Deadline for each dispatched block. `None` reproduces the
    /// original unbounded behavior: a stalled worker blocks its task
    /// forever.
    pub task_timeout: Option<Duration>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            baseline: true,
            task_timeout: None,
        }
    }
}

/// What a completed job yields.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub c: Matrix,
    pub metrics: JobMetrics,
    /// Whether the distributed result equals the sequential baseline;
    /// absent when the baseline was skipped.
    pub matches_baseline: Option<bool>,
}

/// What one dispatch task hands the collector on success.
struct TaskReply {
    index: usize,
    c_block: Matrix,
    send_time: Duration,
    wait_time: Duration,
}

/// Dispatch failures travel as `(block index, reason)` so the job error
/// can name every block that contributed nothing.
type TaskOutcome = std::result::Result<TaskReply, (usize, String)>;

impl<R, W> WorkerPool<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Runs one job over the pool's idle workers.
    ///
    /// A is partitioned into one block per idle worker; each block is
    /// dispatched on its own task, all tasks are awaited at a join
    /// barrier, and the result blocks are concatenated in index order;
    /// completion order never affects C's row order.
    ///
    /// Each dispatch task emits its `(index, block, timings)` back
    /// through the join handle; the join loop below is the single
    /// consumer that owns the result map and the metrics accumulator,
    /// so no lock guards either.
    ///
    /// # Errors
    /// `NoWorkers` with an empty pool, `Matrix` for shape/partition
    /// failures caught before dispatch, `PartialResults` when any block
    /// fails to come back. All are job-local: the pool stays usable.
    pub async fn run_job(&mut self, job: Job, opts: &JobOptions) -> Result<JobOutcome> {
        let k = self.idle_count();
        if k == 0 {
            return Err(CoordinatorError::NoWorkers);
        }

        let mut metrics = JobMetrics::new(job.a.rows(), k);

        if job.a.cols() != job.b.rows() {
            return Err(MatrixError::DimensionMismatch {
                left_cols: job.a.cols(),
                right_rows: job.b.rows(),
            }
            .into());
        }

        // Comparison baseline only; never on the distributed path.
        let baseline = if opts.baseline {
            let started = Instant::now();
            let c_seq = job.a.multiply(&job.b)?;
            let seq_time = started.elapsed();
            metrics.t_sequential = Some(seq_time);
            info!("sequential baseline: {seq_time:?}");
            Some(c_seq)
        } else {
            None
        };

        let split_started = Instant::now();
        let blocks = matrix::split(&job.a, k)?;
        metrics.overhead_split = split_started.elapsed();
        info!("A split into {k} block(s) for {k} worker(s)");

        let workers = self.take_idle();

        let dist_started = Instant::now();
        let mut set: JoinSet<(WorkerHandle<R, W>, TaskOutcome)> = JoinSet::new();

        for (mut handle, block) in workers.into_iter().zip(blocks) {
            let b = job.b.clone();
            let limit = opts.task_timeout;

            set.spawn(async move {
                let index = block.index;
                handle.set_state(WorkerState::Busy);

                let work = dispatch_block(&mut handle, block, b);
                let outcome = match limit {
                    Some(limit) => match time::timeout(limit, work).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err((index, format!("no result within {limit:?}"))),
                    },
                    None => work.await,
                };

                // A failed or timed-out handle may have a half-read
                // frame on its stream, so it is retired rather than
                // reused.
                handle.set_state(match outcome {
                    Ok(_) => WorkerState::Idle,
                    Err(_) => WorkerState::Disconnected,
                });

                (handle, outcome)
            });
        }

        // Join barrier doubling as the collector: this loop alone owns
        // the result map and the timing totals.
        let mut results: BTreeMap<usize, Matrix> = BTreeMap::new();
        let mut failed: Vec<(usize, String)> = Vec::new();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((handle, outcome)) => {
                    match outcome {
                        Ok(reply) => {
                            debug!("collected block {} from {}", reply.index, handle.addr());
                            metrics.overhead_comm += reply.send_time;
                            metrics.time_compute += reply.wait_time;
                            results.insert(reply.index, reply.c_block);
                        }
                        Err((index, reason)) => {
                            warn!("block {index} via {} failed: {reason}", handle.addr());
                            failed.push((index, reason));
                        }
                    }
                    self.put_back(handle);
                }
                Err(e) => error!("dispatch task panicked: {e}"),
            }
        }

        metrics.t_distributed = dist_started.elapsed();

        if results.len() != k {
            failed.sort_by_key(|(index, _)| *index);
            return Err(CoordinatorError::PartialResults {
                expected: k,
                received: results.len(),
                failed,
            });
        }

        // BTreeMap iteration is ascending by block index, which is
        // exactly the reconstruction order.
        let reconstruct_started = Instant::now();
        let mut rows = Vec::with_capacity(job.a.rows());
        for block in results.into_values() {
            rows.extend(block.into_rows());
        }
        let c = Matrix::from_rows(rows)?;
        metrics.overhead_reconstruct = reconstruct_started.elapsed();

        let matches_baseline = baseline.map(|c_seq| c_seq == c);

        Ok(JobOutcome {
            c,
            metrics,
            matches_baseline,
        })
    }
}

/// Sends one `task` frame and waits for its `result`, timing both
/// phases separately. Unexpected messages in between are logged and
/// skipped; the block a `result` lands under is the index the worker
/// reports, not the one sent.
async fn dispatch_block<R, W>(
    handle: &mut WorkerHandle<R, W>,
    block: Block,
    b: Matrix,
) -> TaskOutcome
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let index = block.index;
    let task = Message::Task {
        block_index: index,
        a_block: block.rows,
        b,
    };

    let send_started = Instant::now();
    handle
        .send(&task)
        .await
        .map_err(|e| (index, format!("send failed: {e}")))?;
    let send_time = send_started.elapsed();

    let wait_started = Instant::now();
    let (reply_index, c_block) = loop {
        match handle.recv().await {
            Ok(Message::Result {
                block_index,
                c_block,
            }) => break (block_index, c_block),
            Ok(other) => {
                warn!(
                    "worker {}: skipping unexpected message: {other:?}",
                    handle.addr()
                );
            }
            Err(e) => return Err((index, format!("receive failed: {e}"))),
        }
    };
    let wait_time = wait_started.elapsed();

    Ok(TaskReply {
        index: reply_index,
        c_block,
        send_time,
        wait_time,
    })
}
