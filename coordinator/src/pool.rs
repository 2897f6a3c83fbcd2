use std::{io, net::SocketAddr};

use log::{info, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{
        TcpListener,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};
use wire::{FrameReceiver, FrameSender, Message};

/// Lifecycle of one worker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Connecting,
    Idle,
    Busy,
    Disconnected,
    Exited,
}

/// One established worker connection: its address, its framed channel
/// ends and its lifecycle state.
///
/// Handles are created when a worker dials in and persist across jobs;
/// a handle is only destroyed with its pool, though once `Disconnected`
/// or `Exited` it is never dispatched to again.
pub struct WorkerHandle<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    addr: SocketAddr,
    state: WorkerState,
    rx: FrameReceiver<R>,
    tx: FrameSender<W>,
}

impl<R, W> WorkerHandle<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wraps a freshly accepted connection. The handle starts out
    /// `Connecting`; registering it with a pool marks it `Idle`.
    pub fn new(addr: SocketAddr, rx: FrameReceiver<R>, tx: FrameSender<W>) -> Self {
        Self {
            addr,
            state: WorkerState::Connecting,
            rx,
            tx,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: WorkerState) {
        self.state = state;
    }

    pub async fn send(&mut self, msg: &Message) -> wire::Result<()> {
        self.tx.send(msg).await
    }

    pub async fn recv(&mut self) -> wire::Result<Message> {
        self.rx.recv().await
    }
}

/// The set of worker connections established once at startup and reused
/// across every job. There is no reconnect logic: a worker that drops
/// out stays out.
pub struct WorkerPool<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    workers: Vec<WorkerHandle<R, W>>,
}

impl<R, W> Default for WorkerPool<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> WorkerPool<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new() -> Self {
        Self {
            workers: Vec::new(),
        }
    }

    /// Adds an established connection to the pool, marking it `Idle`.
    pub fn register(&mut self, mut handle: WorkerHandle<R, W>) {
        handle.set_state(WorkerState::Idle);
        info!("worker registered: {}", handle.addr());
        self.workers.push(handle);
    }

    /// Total handles ever registered, whatever their state.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Handles currently available for dispatch.
    pub fn idle_count(&self) -> usize {
        self.workers
            .iter()
            .filter(|h| h.state() == WorkerState::Idle)
            .count()
    }

    /// Moves every idle handle out for the duration of a job; they come
    /// back through `put_back` as their dispatch tasks finish.
    pub(crate) fn take_idle(&mut self) -> Vec<WorkerHandle<R, W>> {
        let (idle, kept) = std::mem::take(&mut self.workers)
            .into_iter()
            .partition(|h| h.state() == WorkerState::Idle);
        self.workers = kept;
        idle
    }

    pub(crate) fn put_back(&mut self, handle: WorkerHandle<R, W>) {
        self.workers.push(handle);
    }

    /// Sends `exit` to every idle worker and marks it `Exited`.
    ///
    /// Send failures are logged and the handle is marked `Disconnected`
    /// instead; shutdown itself never fails.
    pub async fn shutdown(&mut self) {
        for handle in &mut self.workers {
            if handle.state() != WorkerState::Idle {
                continue;
            }
            match handle.send(&Message::Exit).await {
                Ok(()) => handle.set_state(WorkerState::Exited),
                Err(e) => {
                    warn!("exit to {} failed: {e}", handle.addr());
                    handle.set_state(WorkerState::Disconnected);
                }
            }
        }
    }
}

impl WorkerPool<OwnedReadHalf, OwnedWriteHalf> {
    /// Accepts exactly `count` worker connections on `listener` and
    /// registers each one.
    pub async fn accept(listener: &TcpListener, count: usize) -> io::Result<Self> {
        let mut pool = Self::new();

        while pool.len() < count {
            let (stream, addr) = listener.accept().await?;
            let (rx, tx) = stream.into_split();
            let (rx, tx) = wire::channel(rx, tx);
            pool.register(WorkerHandle::new(addr, rx, tx));
        }

        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{self as tokio_io, DuplexStream, ReadHalf, WriteHalf};

    fn test_handle(n: usize) -> WorkerHandle<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>> {
        let (stream, _peer) = tokio_io::duplex(64);
        let (rx, tx) = tokio_io::split(stream);
        let (rx, tx) = wire::channel(rx, tx);
        let addr = format!("127.0.0.1:{}", 40000 + n).parse().unwrap();
        WorkerHandle::new(addr, rx, tx)
    }

    #[test]
    fn registration_marks_handles_idle() {
        let handle = test_handle(0);
        assert_eq!(handle.state(), WorkerState::Connecting);

        let mut pool = WorkerPool::new();
        pool.register(handle);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn take_idle_skips_retired_handles() {
        let mut pool = WorkerPool::new();
        pool.register(test_handle(0));
        pool.register(test_handle(1));

        let mut taken = pool.take_idle();
        assert_eq!(taken.len(), 2);
        assert_eq!(pool.idle_count(), 0);

        taken[0].set_state(WorkerState::Disconnected);
        for handle in taken {
            pool.put_back(handle);
        }

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.take_idle().len(), 1);
    }
}
