pub mod error;
pub mod loop_;
pub mod metrics;

pub use error::WorkerErr;
pub use loop_::WorkerLoop;
pub use metrics::WorkerMetrics;

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;
