pub mod error;
pub mod job;
pub mod metrics;
pub mod pool;

pub use error::CoordinatorError;
pub use job::{Job, JobOptions, JobOutcome};
pub use metrics::{JobMetrics, JobReport};
pub use pool::{WorkerHandle, WorkerPool, WorkerState};

/// The coordinator module's result type.
pub type Result<T> = std::result::Result<T, CoordinatorError>;
