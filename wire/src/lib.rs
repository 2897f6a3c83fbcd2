mod error;
mod msg;
mod receiver;
mod sender;

use tokio::io::{AsyncRead, AsyncWrite};

pub use error::WireError;
pub use msg::Message;
pub use receiver::FrameReceiver;
pub use sender::FrameSender;

/// The wire module's result type.
pub type Result<T> = std::result::Result<T, WireError>;

type LenType = u32;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Creates both `FrameReceiver` and `FrameSender` network channel parts.
///
/// Given a reader and a writer, returns both ends of the framed
/// communication over them.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// The framed channel in the form of a receiver and a sender.
pub fn channel<R, W>(rx: R, tx: W) -> (FrameReceiver<R>, FrameSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (FrameReceiver::new(rx), FrameSender::new(tx))
}
