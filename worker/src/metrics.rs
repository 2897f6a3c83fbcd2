use std::time::Duration;

/// Running totals for one worker's lifetime on a connection.
#[derive(Debug, Default, Clone)]
pub struct WorkerMetrics {
    pub compute_time: Duration,
    pub tasks: u64,
}

impl WorkerMetrics {
    #[inline]
    pub fn record_task(&mut self, compute: Duration) {
        self.tasks += 1;
        self.compute_time += compute;
    }
}
