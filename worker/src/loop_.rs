use std::{io, time::Instant};

use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    task,
};
use wire::{FrameReceiver, FrameSender, Message};

use crate::{Result, metrics::WorkerMetrics};

/// Orchestrates the worker lifecycle over one persistent connection.
///
/// Tasks are processed strictly sequentially: receive one `task` frame,
/// compute its block product, reply with a `result` frame, repeat. There
/// is never more than one outstanding task on the connection.
///
/// Concurrency note:
/// - The multiply kernel is CPU-bound and runs on Tokio's blocking pool
///   via `spawn_blocking`, moving the task's matrices into the closure.
pub struct WorkerLoop {
    metrics: WorkerMetrics,
}

impl Default for WorkerLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerLoop {
    pub fn new() -> Self {
        Self {
            metrics: WorkerMetrics::default(),
        }
    }

    /// Runs the worker until told to exit or the peer disconnects.
    ///
    /// Message handling:
    /// - `task`: compute the block product and reply with `result`. A
    ///   dimension mismatch aborts that task only: it is logged and the
    ///   loop moves on to the next frame without replying.
    /// - `exit`: terminate cleanly.
    /// - anything else: logged and skipped, the connection stays up.
    /// - peer closing the stream: terminate cleanly.
    ///
    /// # Returns
    /// The accumulated metrics, or `WorkerErr` on transport failure.
    pub async fn run<R, W>(
        mut self,
        mut rx: FrameReceiver<R>,
        mut tx: FrameSender<W>,
    ) -> Result<WorkerMetrics>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let msg = match rx.recv().await {
                Ok(msg) => msg,
                Err(e) if e.is_eof() => {
                    info!("coordinator closed the connection");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            match msg {
                Message::Task {
                    block_index,
                    a_block,
                    b,
                } => {
                    debug!(
                        "task received: block {block_index}, {}x{} by {}x{}",
                        a_block.rows(),
                        a_block.cols(),
                        b.rows(),
                        b.cols()
                    );

                    // Run the kernel on the blocking pool; the matrices
                    // move in and only the product comes back.
                    let joined = task::spawn_blocking(move || {
                        let started = Instant::now();
                        let product = a_block.multiply(&b);
                        (product, started.elapsed())
                    })
                    .await
                    .map_err(|e| io::Error::other(format!("compute join error: {e}")))?;

                    let (product, compute) = joined;
                    let c_block = match product {
                        Ok(c) => c,
                        Err(e) => {
                            error!("task for block {block_index} aborted: {e}");
                            continue;
                        }
                    };

                    self.metrics.record_task(compute);
                    tx.send(&Message::Result {
                        block_index,
                        c_block,
                    })
                    .await?;
                    info!("block {block_index} computed in {compute:?}");
                }
                Message::Exit => {
                    info!("exit requested by coordinator");
                    break;
                }
                other => warn!("ignoring unexpected message: {other:?}"),
            }
        }

        Ok(self.metrics)
    }
}
