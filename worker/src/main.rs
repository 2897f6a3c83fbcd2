use std::{env, io};

use log::info;
use tokio::{net::TcpStream, signal};

use worker::WorkerLoop;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "5000";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let addr = format!(
        "{}:{}",
        env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
    );

    let stream = TcpStream::connect(&addr).await?;
    info!("connected to coordinator at {addr}, awaiting tasks");

    let (rx, tx) = stream.into_split();
    let (rx, tx) = wire::channel(rx, tx);

    let worker = WorkerLoop::new();

    tokio::select! {
        ret = worker.run(rx, tx) => {
            let metrics = ret.map_err(io::Error::from)?;
            info!(
                "done: {} task(s) served, {:?} computing",
                metrics.tasks, metrics.compute_time
            );
        }
        _ = signal::ctrl_c() => {
            info!("interrupted, closing connection");
        }
    }

    Ok(())
}
