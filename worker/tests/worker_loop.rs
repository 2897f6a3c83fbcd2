use matrix::Matrix;
use tokio::io::{
    self as tokio_io, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf,
};
use wire::{FrameReceiver, FrameSender, Message};

use worker::WorkerLoop;

type Chan = (
    FrameReceiver<ReadHalf<DuplexStream>>,
    FrameSender<WriteHalf<DuplexStream>>,
);

fn channel_pair() -> (Chan, Chan) {
    let (stream1, stream2) = tokio_io::duplex(1 << 16);
    let (rx1, tx1) = tokio_io::split(stream1);
    let chan1 = wire::channel(rx1, tx1);
    let (rx2, tx2) = tokio_io::split(stream2);
    let chan2 = wire::channel(rx2, tx2);
    (chan1, chan2)
}

fn ones(rows: usize, cols: usize) -> Matrix {
    Matrix::from_rows(vec![vec![1.0; cols]; rows]).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_computes_and_replies() {
    let ((mut co_rx, mut co_tx), (wk_rx, wk_tx)) = channel_pair();

    let worker_task = tokio::spawn(WorkerLoop::new().run(wk_rx, wk_tx));

    let a_block = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = Matrix::from_rows(vec![vec![1.0], vec![1.0]]).unwrap();

    co_tx
        .send(&Message::Task {
            block_index: 3,
            a_block,
            b,
        })
        .await
        .unwrap();

    match co_rx.recv().await.unwrap() {
        Message::Result {
            block_index,
            c_block,
        } => {
            assert_eq!(block_index, 3);
            let expected =
                Matrix::from_rows(vec![vec![3.0], vec![7.0]]).unwrap();
            assert_eq!(c_block, expected);
        }
        other => panic!("unexpected msg: {other:?}"),
    }

    co_tx.send(&Message::Exit).await.unwrap();
    let metrics = worker_task.await.unwrap().unwrap();
    assert_eq!(metrics.tasks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_serves_tasks_sequentially_until_exit() {
    let ((mut co_rx, mut co_tx), (wk_rx, wk_tx)) = channel_pair();

    let worker_task = tokio::spawn(WorkerLoop::new().run(wk_rx, wk_tx));

    for index in 0..3 {
        co_tx
            .send(&Message::Task {
                block_index: index,
                a_block: ones(2, 3),
                b: ones(3, 2),
            })
            .await
            .unwrap();

        match co_rx.recv().await.unwrap() {
            Message::Result {
                block_index,
                c_block,
            } => {
                assert_eq!(block_index, index);
                assert!(c_block.as_rows().iter().flatten().all(|&v| v == 3.0));
            }
            other => panic!("unexpected msg: {other:?}"),
        }
    }

    co_tx.send(&Message::Exit).await.unwrap();
    let metrics = worker_task.await.unwrap().unwrap();
    assert_eq!(metrics.tasks, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_message_is_skipped_not_fatal() {
    let (coordinator, worker_side) = tokio_io::duplex(1 << 16);
    let (wk_rx, wk_tx) = tokio_io::split(worker_side);
    let (wk_rx, wk_tx) = wire::channel(wk_rx, wk_tx);

    let worker_task = tokio::spawn(WorkerLoop::new().run(wk_rx, wk_tx));

    let (co_raw_rx, mut co_raw_tx) = tokio_io::split(coordinator);

    // A frame with a foreign type tag, written raw.
    let payload = br#"{"type":"health_check"}"#;
    co_raw_tx
        .write_all(&(payload.len() as u32).to_be_bytes())
        .await
        .unwrap();
    co_raw_tx.write_all(payload).await.unwrap();

    // The worker must still serve the task that follows.
    let (mut co_rx, mut co_tx) = wire::channel(co_raw_rx, co_raw_tx);
    co_tx
        .send(&Message::Task {
            block_index: 0,
            a_block: ones(1, 1),
            b: ones(1, 1),
        })
        .await
        .unwrap();

    assert!(matches!(
        co_rx.recv().await.unwrap(),
        Message::Result { block_index: 0, .. }
    ));

    co_tx.send(&Message::Exit).await.unwrap();
    worker_task.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dimension_mismatch_aborts_task_but_not_connection() {
    let ((mut co_rx, mut co_tx), (wk_rx, wk_tx)) = channel_pair();

    let worker_task = tokio::spawn(WorkerLoop::new().run(wk_rx, wk_tx));

    // Incompatible shapes: no reply for this one.
    co_tx
        .send(&Message::Task {
            block_index: 0,
            a_block: ones(1, 2),
            b: ones(3, 1),
        })
        .await
        .unwrap();

    // A compatible task right behind it still gets served.
    co_tx
        .send(&Message::Task {
            block_index: 1,
            a_block: ones(1, 3),
            b: ones(3, 1),
        })
        .await
        .unwrap();

    match co_rx.recv().await.unwrap() {
        Message::Result {
            block_index,
            c_block,
        } => {
            assert_eq!(block_index, 1);
            assert_eq!(c_block, Matrix::from_rows(vec![vec![3.0]]).unwrap());
        }
        other => panic!("unexpected msg: {other:?}"),
    }

    co_tx.send(&Message::Exit).await.unwrap();
    let metrics = worker_task.await.unwrap().unwrap();
    assert_eq!(metrics.tasks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn peer_closing_ends_the_loop_cleanly() {
    let ((co_rx, co_tx), (wk_rx, wk_tx)) = channel_pair();

    let worker_task = tokio::spawn(WorkerLoop::new().run(wk_rx, wk_tx));

    drop(co_rx);
    drop(co_tx);

    let metrics = worker_task.await.unwrap().unwrap();
    assert_eq!(metrics.tasks, 0);
}
