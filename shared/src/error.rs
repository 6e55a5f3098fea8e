use thiserror::Error;

/// Everything that can go wrong on the wire.
///
/// Framing errors are fatal to the connection that produced them: the serving
/// loop logs the error and closes the socket, nothing is retried. Detection
/// failures never surface here; "no circle found" is a valid outcome handled
/// on the client side.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A frame payload exceeds [`crate::codec::MAX_FRAME_LEN`].
    #[error("frame of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),

    /// The stream ended partway through a length-prefixed read.
    #[error("stream ended before the full frame arrived")]
    IncompleteFrame,

    /// The peer closed the connection on a clean message boundary.
    #[error("peer closed the connection")]
    ConnectionClosed,

    /// Coordinate bytes did not parse as `"XXXX,YYYY"`.
    #[error("coordinate bytes {0:?} are not \"XXXX,YYYY\"")]
    MalformedCoordinate(String),

    /// A coordinate value does not fit in four decimal digits.
    #[error("coordinate value {0} does not fit in four digits")]
    OutOfRange(u16),

    /// A signaling message length header was not four decimal digits, or the
    /// body was not valid UTF-8.
    #[error("malformed signaling message")]
    MalformedSignal,

    /// A signaling message is too long for its four-digit length header.
    #[error("signaling message of {0} bytes exceeds the four-digit header")]
    SignalTooLarge(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// True for an orderly shutdown by the peer, as opposed to a framing or
    /// transport fault. Serving loops log these at a lower severity.
    pub fn is_clean_close(&self) -> bool {
        matches!(self, ProtocolError::ConnectionClosed)
    }
}
