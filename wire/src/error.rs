use std::{error::Error, fmt, io};

/// Failures of the framed transport.
#[derive(Debug)]
pub enum WireError {
    /// The stream failed or closed before a complete frame arrived.
    Framing(io::Error),
    /// A complete frame arrived but its payload is not valid JSON, or a
    /// message could not be encoded.
    Codec(serde_json::Error),
}

impl WireError {
    /// True when the peer closed the stream mid-frame rather than the
    /// payload being malformed.
    pub fn is_eof(&self) -> bool {
        matches!(self, WireError::Framing(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Framing(e) => write!(f, "framing error: {e}"),
            WireError::Codec(e) => write!(f, "codec error: {e}"),
        }
    }
}

impl Error for WireError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WireError::Framing(e) => Some(e),
            WireError::Codec(e) => Some(e),
        }
    }
}

impl From<io::Error> for WireError {
    fn from(value: io::Error) -> Self {
        Self::Framing(value)
    }
}

impl From<serde_json::Error> for WireError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<WireError> for io::Error {
    fn from(value: WireError) -> Self {
        match value {
            WireError::Framing(e) => e,
            WireError::Codec(e) => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}
