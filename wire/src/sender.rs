//! The sending end of the application layer protocol.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{LEN_TYPE_SIZE, LenType, Message, Result};

/// The sending end handle of the communication.
///
/// Frames are written with a single `write_all` of prefix plus payload,
/// so frames from one sender are never interleaved on the stream.
pub struct FrameSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> FrameSender<W> {
    /// Creates a new `FrameSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            buf: Vec::new(),
        }
    }

    /// Sends `msg` as one length-prefixed frame: a 4-byte unsigned
    /// big-endian payload length followed by the UTF-8 JSON payload.
    ///
    /// # Arguments
    /// * `msg` - The message to encode and send.
    ///
    /// # Returns
    /// A result object that returns `WireError` on failure.
    pub async fn send(&mut self, msg: &Message) -> Result<()> {
        let Self { buf, tx } = self;

        buf.clear();
        buf.resize(LEN_TYPE_SIZE, 0);

        serde_json::to_writer(&mut *buf, msg)?;

        let len = buf.len() - LEN_TYPE_SIZE;
        let prefix = (len as LenType).to_be_bytes();
        buf[..LEN_TYPE_SIZE].copy_from_slice(&prefix);

        tx.write_all(buf).await?;
        tx.flush().await?;

        Ok(())
    }
}
