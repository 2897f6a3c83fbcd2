use std::time::Duration;

use serde::Serialize;

/// Timing breakdown of one job, owned by the coordinator and reset per
/// job.
///
/// `time_compute` and `overhead_comm` are aggregates over all worker
/// calls; the flat report divides compute by the worker count to match
/// what downstream tooling expects (mean parallel compute).
#[derive(Debug, Clone)]
pub struct JobMetrics {
    /// Rows of A, the conventional "size" of the job.
    pub size: usize,
    pub num_workers: usize,
    /// Wall time of the sequential baseline, when it was run.
    pub t_sequential: Option<Duration>,
    /// Wall time from first dispatch to the join barrier.
    pub t_distributed: Duration,
    pub overhead_split: Duration,
    /// Aggregate time spent writing task frames.
    pub overhead_comm: Duration,
    /// Aggregate time spent awaiting result frames (the workers'
    /// compute-plus-transfer time).
    pub time_compute: Duration,
    pub overhead_reconstruct: Duration,
}

impl JobMetrics {
    pub fn new(size: usize, num_workers: usize) -> Self {
        Self {
            size,
            num_workers,
            t_sequential: None,
            t_distributed: Duration::ZERO,
            overhead_split: Duration::ZERO,
            overhead_comm: Duration::ZERO,
            time_compute: Duration::ZERO,
            overhead_reconstruct: Duration::ZERO,
        }
    }

    /// `t_sequential / t_distributed`. `None` when the baseline was
    /// skipped or the distributed time is zero.
    pub fn speedup(&self) -> Option<f64> {
        let seq = self.t_sequential?.as_secs_f64();
        let dist = self.t_distributed.as_secs_f64();
        (dist > 0.0).then(|| seq / dist)
    }

    /// `speedup / num_workers * 100`, in percent.
    pub fn efficiency(&self) -> Option<f64> {
        Some(self.speedup()? / self.num_workers as f64 * 100.0)
    }

    /// Everything that is not parallel computation.
    pub fn total_overhead(&self) -> Duration {
        self.overhead_split + self.overhead_comm + self.overhead_reconstruct
    }

    /// Mean compute-wait per worker.
    pub fn mean_compute(&self) -> Duration {
        if self.num_workers == 0 {
            return Duration::ZERO;
        }
        self.time_compute / self.num_workers as u32
    }

    /// The flat record consumed by downstream reporting tools. Field
    /// names and float-second units are the stable contract.
    pub fn report(&self) -> JobReport {
        JobReport {
            size: self.size,
            num_workers: self.num_workers,
            t_sequential: self.t_sequential.map(|d| d.as_secs_f64()),
            t_distributed: self.t_distributed.as_secs_f64(),
            overhead_split: self.overhead_split.as_secs_f64(),
            overhead_comm: self.overhead_comm.as_secs_f64(),
            time_compute: self.mean_compute().as_secs_f64(),
            overhead_reconstruct: self.overhead_reconstruct.as_secs_f64(),
        }
    }
}

/// One job's flat metrics record, in seconds.
///
/// `t_sequential` is `null` when the baseline was disabled; it is never
/// fabricated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub size: usize,
    pub num_workers: usize,
    pub t_sequential: Option<f64>,
    pub t_distributed: f64,
    pub overhead_split: f64,
    pub overhead_comm: f64,
    pub time_compute: f64,
    pub overhead_reconstruct: f64,
}
