use std::{env, io, str::FromStr, time::Duration};

use log::{error, info};
use tokio::net::TcpListener;

use coordinator::{Job, JobMetrics, JobOptions, WorkerPool};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "5000";

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let addr = format!(
        "{}:{}",
        env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
    );

    let num_workers: usize = env_or("NUM_WORKERS", 2);
    let jobs: usize = env_or("JOBS", 1);
    let rows_a: usize = env_or("ROWS_A", 6);
    let cols_a: usize = env_or("COLS_A", 4);
    let cols_b: usize = env_or("COLS_B", 5);

    let opts = JobOptions {
        baseline: env_or("BASELINE", 1u8) != 0,
        task_timeout: env::var("TASK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs),
    };

    let listener = TcpListener::bind(&addr).await?;
    info!("waiting for {num_workers} worker(s) on {addr}");
    let mut pool = WorkerPool::accept(&listener, num_workers).await?;

    for job_n in 0..jobs {
        let a = matrix::generate(rows_a, cols_a, 1..=10);
        let b = matrix::generate(cols_a, cols_b, 1..=10);

        match pool.run_job(Job { a, b }, &opts).await {
            Ok(outcome) => {
                log_summary(&outcome.metrics);
                if let Some(equal) = outcome.matches_baseline {
                    info!("distributed result equals sequential: {equal}");
                }
                // The flat record downstream collection tools consume.
                println!("{}", serde_json::to_string(&outcome.metrics.report())?);
            }
            Err(e) => error!("job {job_n} failed: {e}"),
        }
    }

    pool.shutdown().await;
    info!("all workers released, shutting down");
    Ok(())
}

fn log_summary(metrics: &JobMetrics) {
    let dist = metrics.t_distributed.as_secs_f64();
    let pct = |d: std::time::Duration| {
        if dist > 0.0 {
            d.as_secs_f64() / dist * 100.0
        } else {
            0.0
        }
    };

    info!(
        "distributed time: {:?} ({} row(s) of A across {} worker(s))",
        metrics.t_distributed, metrics.size, metrics.num_workers
    );
    info!(
        "split overhead: {:?} ({:.1}%)",
        metrics.overhead_split,
        pct(metrics.overhead_split)
    );
    info!(
        "communication overhead: {:?} ({:.1}%)",
        metrics.overhead_comm,
        pct(metrics.overhead_comm)
    );
    info!(
        "parallel compute (mean): {:?} ({:.1}%)",
        metrics.mean_compute(),
        pct(metrics.mean_compute())
    );
    info!(
        "reconstruct overhead: {:?} ({:.1}%)",
        metrics.overhead_reconstruct,
        pct(metrics.overhead_reconstruct)
    );
    info!("total overhead: {:?}", metrics.total_overhead());

    if let (Some(speedup), Some(efficiency)) = (metrics.speedup(), metrics.efficiency()) {
        info!("speedup: {speedup:.2}x, efficiency: {efficiency:.1}%");
        if let Some(seq) = metrics.t_sequential {
            let gain = seq.as_secs_f64() - dist;
            info!("gain over sequential: {gain:.6}s");
        }
    }
}
