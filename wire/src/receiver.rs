//! The receiving end of the application layer protocol.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{LEN_TYPE_SIZE, LenType, Message, Result};

/// The receiving end handle of the communication.
pub struct FrameReceiver<R: AsyncRead + Unpin> {
    rx: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReceiver<R> {
    /// Creates a new `FrameReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self {
            rx,
            buf: Vec::new(),
        }
    }

    /// Waits until one whole frame is available and decodes it.
    ///
    /// Short reads are retried until the 4-byte length prefix and then
    /// the full payload have been accumulated; the stream closing at any
    /// point in between is a `WireError::Framing`.
    ///
    /// # Returns
    /// The decoded message, or `WireError` on failure. A payload whose
    /// `type` tag is unrecognized decodes to `Message::Unknown` rather
    /// than failing.
    pub async fn recv(&mut self) -> Result<Message> {
        let mut prefix = [0; LEN_TYPE_SIZE];
        self.rx.read_exact(&mut prefix).await?;
        let len = LenType::from_be_bytes(prefix) as usize;

        self.buf.clear();
        self.buf.resize(len, 0);
        self.rx.read_exact(&mut self.buf).await?;

        let msg = serde_json::from_slice(&self.buf)?;
        Ok(msg)
    }
}
